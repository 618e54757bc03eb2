//! # foodshare-core
//!
//! The reservation lifecycle services.  [`ItemCatalog`] owns donation
//! listings, [`ReservationLedger`] owns reservations and their state machine,
//! and the smaller profile and feedback services cover registration and app
//! feedback.
//!
//! Services are `Send + Sync` and share one [`SharedDatabase`].  Every
//! collaborator (geocoder, object store, notifier, identity) is passed in
//! explicitly as a trait object.

use std::sync::{Arc, Mutex};

use foodshare_store::Database;

pub mod access;
pub mod catalog;
pub mod error;
pub mod feedback;
pub mod ledger;
pub mod notify;
pub mod object_store;
pub mod profiles;
pub mod validate;

#[cfg(test)]
mod testing;

pub use catalog::{
    CreatedItem, ImageOutcome, ImageUploadPolicy, ItemCatalog, ItemFilter, ItemImage, ItemListing,
    ItemUpdate, NewItem,
};
pub use error::{Result, ServiceError};
pub use feedback::{FeedbackDraft, FeedbackService};
pub use ledger::{ReservationDetail, ReservationLedger};
pub use notify::{LogNotifier, Notification, Notifier, NotifyError};
pub use object_store::{ObjectStore, ObjectStoreError};
pub use profiles::{ProfileService, Registration};

/// Database handle shared by every service.  Guards are never held across an
/// `.await`.
pub type SharedDatabase = Arc<Mutex<Database>>;

/// Wrap an opened database for sharing between services.
pub fn share(db: Database) -> SharedDatabase {
    Arc::new(Mutex::new(db))
}
