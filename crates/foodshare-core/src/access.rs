//! Role checks applied by every mutating operation.

use foodshare_shared::{AuthenticatedUser, IdentityProvider, Role};

use crate::error::{Result, ServiceError};

/// The signed-in user, or `Validation` when nobody is signed in.
pub fn require_user(identity: &dyn IdentityProvider) -> Result<AuthenticatedUser> {
    identity
        .current_user()
        .ok_or_else(|| ServiceError::Validation("must be logged in".into()))
}

/// The signed-in user, provided they hold `role`.
pub fn require_role(
    identity: &dyn IdentityProvider,
    role: Role,
    action: &str,
) -> Result<AuthenticatedUser> {
    let user = require_user(identity)?;
    if user.role != role {
        return Err(ServiceError::Forbidden(format!(
            "only a {} may {action}",
            role.as_str()
        )));
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foodshare_shared::Anonymous;

    #[test]
    fn anonymous_is_validation_error() {
        assert!(matches!(
            require_user(&Anonymous),
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            require_role(&Anonymous, Role::Rider, "claim"),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn wrong_role_is_forbidden() {
        let donator = AuthenticatedUser::new("d1", Role::Donator);
        match require_role(&donator, Role::Rider, "claim a slot") {
            Err(ServiceError::Forbidden(msg)) => assert_eq!(msg, "only a rider may claim a slot"),
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(
            require_role(&donator, Role::Donator, "list").unwrap().id.as_str(),
            "d1"
        );
    }
}
