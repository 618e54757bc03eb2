//! Identity abstraction.
//!
//! Authentication itself happens outside this workspace (an upstream auth
//! gateway). Components that need to know who is acting receive an
//! [`IdentityProvider`] explicitly instead of reading a global session.

use serde::{Deserialize, Serialize};

use crate::types::{Role, UserId};

/// An authenticated user together with the role attribute from their profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: UserId,
    pub role: Role,
}

impl AuthenticatedUser {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: UserId::new(id),
            role,
        }
    }
}

/// Supplies the user on whose behalf an operation runs.
pub trait IdentityProvider: Send + Sync {
    /// `None` when nobody is signed in.
    fn current_user(&self) -> Option<AuthenticatedUser>;
}

impl IdentityProvider for AuthenticatedUser {
    fn current_user(&self) -> Option<AuthenticatedUser> {
        Some(self.clone())
    }
}

impl IdentityProvider for Option<AuthenticatedUser> {
    fn current_user(&self) -> Option<AuthenticatedUser> {
        self.clone()
    }
}

/// Provider for callers that are not signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user(&self) -> Option<AuthenticatedUser> {
        None
    }
}
