use thiserror::Error;

/// Errors raised while parsing or constructing shared value types.
#[derive(Error, Debug)]
pub enum TypeError {
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    #[error("Latitude must be within [-90, 90], got {0}")]
    LatitudeOutOfRange(f64),

    #[error("Longitude must be within [-180, 180], got {0}")]
    LongitudeOutOfRange(f64),

    #[error("Invalid identifier: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("Unknown state: {0}")]
    UnknownState(String),
}
