use std::sync::PoisonError;

use thiserror::Error;

use foodshare_geo::GeoError;
use foodshare_store::StoreError;

/// Errors returned by the catalog and ledger operations.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Bad or missing input, including a missing signed-in user.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Lost a race, or the target is already taken.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// The requested transition is not legal from the current state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Signed in, but not allowed to do this.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage failure: {0}")]
    Storage(String),

    #[error("Network failure: {0}")]
    Network(String),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound => ServiceError::NotFound("record".into()),
            StoreError::Duplicate(what) => ServiceError::Conflict(format!("{what} already exists")),
            other => ServiceError::Storage(other.to_string()),
        }
    }
}

impl From<GeoError> for ServiceError {
    fn from(e: GeoError) -> Self {
        match e {
            GeoError::NotFound(query) => ServiceError::NotFound(format!("location for {query}")),
            other => ServiceError::Network(other.to_string()),
        }
    }
}

impl<T> From<PoisonError<T>> for ServiceError {
    fn from(e: PoisonError<T>) -> Self {
        ServiceError::Storage(format!("Lock poisoned: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
