//! User profile records written at registration.

use rusqlite::params;

use foodshare_shared::UserId;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::UserProfile;
use crate::row::{role_at, ts, ts_at, user_at};

impl Database {
    /// Store a new profile.  A second profile for the same user is a
    /// [`StoreError::Duplicate`].
    pub fn insert_profile(&self, profile: &UserProfile) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (user_id, email, role, first_name, last_name, verified, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    profile.user_id.as_str(),
                    profile.email,
                    profile.role.as_str(),
                    profile.first_name,
                    profile.last_name,
                    profile.verified,
                    ts(&profile.created_at),
                ],
            )
            .map_err(|e| StoreError::from_insert(e, "profile"))?;
        Ok(())
    }

    pub fn get_profile(&self, user: &UserId) -> Result<UserProfile> {
        self.conn()
            .query_row(
                "SELECT user_id, email, role, first_name, last_name, verified, created_at
                 FROM users WHERE user_id = ?1",
                params![user.as_str()],
                |row| {
                    Ok(UserProfile {
                        user_id: user_at(row, 0)?,
                        email: row.get(1)?,
                        role: role_at(row, 2)?,
                        first_name: row.get(3)?,
                        last_name: row.get(4)?,
                        verified: row.get(5)?,
                        created_at: ts_at(row, 6)?,
                    })
                },
            )
            .map_err(StoreError::from_query)
    }

    /// Replace the display names.  Email and role are fixed at registration.
    pub fn update_profile_names(
        &self,
        user: &UserId,
        first_name: Option<&str>,
        last_name: Option<&str>,
    ) -> Result<()> {
        let affected = self.conn().execute(
            "UPDATE users SET first_name = ?1, last_name = ?2 WHERE user_id = ?3",
            params![first_name, last_name, user.as_str()],
        )?;
        if affected == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }
}
