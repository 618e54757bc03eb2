//! Registration and profile upkeep.

use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use foodshare_shared::{Role, UserId};
use foodshare_store::{StoreError, UserProfile};

use crate::error::{Result, ServiceError};
use crate::validate;
use crate::SharedDatabase;

/// Details submitted when a user signs up.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

pub struct ProfileService {
    db: SharedDatabase,
}

impl ProfileService {
    pub fn new(db: SharedDatabase) -> Self {
        Self { db }
    }

    /// Store the profile of a freshly authenticated user.  New profiles
    /// start unverified.
    pub fn register_profile(&self, user_id: &UserId, reg: Registration) -> Result<UserProfile> {
        let profile = UserProfile {
            user_id: user_id.clone(),
            email: validate::email(&reg.email)?,
            role: reg.role,
            first_name: validate::optional(reg.first_name.as_deref()),
            last_name: validate::optional(reg.last_name.as_deref()),
            verified: false,
            created_at: Utc::now(),
        };

        let db = self.db.lock()?;
        db.insert_profile(&profile).map_err(|e| match e {
            StoreError::Duplicate(_) => {
                ServiceError::Conflict(format!("user {} is already registered", user_id.short()))
            }
            other => other.into(),
        })?;

        info!(user = %user_id.short(), role = %profile.role.as_str(), "profile registered");
        Ok(profile)
    }

    pub fn get_profile(&self, user_id: &UserId) -> Result<UserProfile> {
        let db = self.db.lock()?;
        db.get_profile(user_id).map_err(|e| match e {
            StoreError::NotFound => ServiceError::NotFound(format!("profile {}", user_id.short())),
            other => other.into(),
        })
    }

    /// Replace the display names.  Blank names are cleared.
    pub fn update_profile(
        &self,
        user_id: &UserId,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<UserProfile> {
        {
            let db = self.db.lock()?;
            db.update_profile_names(
                user_id,
                validate::optional(first_name).as_deref(),
                validate::optional(last_name).as_deref(),
            )
            .map_err(|e| match e {
                StoreError::NotFound => {
                    ServiceError::NotFound(format!("profile {}", user_id.short()))
                }
                other => other.into(),
            })?;
        }
        self.get_profile(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::memory_db;

    fn registration(email: &str, role: Role) -> Registration {
        Registration {
            email: email.into(),
            role,
            first_name: Some(" Siti ".into()),
            last_name: None,
        }
    }

    #[test]
    fn register_then_fetch() {
        let svc = ProfileService::new(memory_db());
        let uid = UserId::new("uid-1");
        let p = svc
            .register_profile(&uid, registration("siti@example.com", Role::Rider))
            .unwrap();
        assert!(!p.verified);
        assert_eq!(p.first_name.as_deref(), Some("Siti"));

        let fetched = svc.get_profile(&uid).unwrap();
        assert_eq!(fetched.role, Role::Rider);
        assert_eq!(fetched.role.home_route(), "RiderHome");
    }

    #[test]
    fn register_rejects_bad_email_and_duplicates() {
        let svc = ProfileService::new(memory_db());
        let uid = UserId::new("uid-1");
        assert!(matches!(
            svc.register_profile(&uid, registration("nope", Role::Donator)),
            Err(ServiceError::Validation(_))
        ));
        svc.register_profile(&uid, registration("a@example.com", Role::Donator))
            .unwrap();
        assert!(matches!(
            svc.register_profile(&uid, registration("a@example.com", Role::Receiver)),
            Err(ServiceError::Conflict(_))
        ));
    }

    #[test]
    fn update_names() {
        let svc = ProfileService::new(memory_db());
        let uid = UserId::new("uid-1");
        svc.register_profile(&uid, registration("a@example.com", Role::Receiver))
            .unwrap();

        let p = svc.update_profile(&uid, Some("Aminah"), Some("  ")).unwrap();
        assert_eq!(p.first_name.as_deref(), Some("Aminah"));
        assert_eq!(p.last_name, None);

        assert!(matches!(
            svc.update_profile(&UserId::new("ghost"), None, None),
            Err(ServiceError::NotFound(_))
        ));
    }
}
