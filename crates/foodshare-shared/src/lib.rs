//! Types shared by every Foodshare crate: identifiers, roles, coordinates
//! and the identity abstraction consumed by the catalog and ledger.

pub mod constants;
pub mod error;
pub mod identity;
pub mod types;

pub use error::TypeError;
pub use identity::{Anonymous, AuthenticatedUser, IdentityProvider};
pub use types::{GeoPoint, ItemId, ItemStatus, ReservationId, ReservationState, Role, UserId};
