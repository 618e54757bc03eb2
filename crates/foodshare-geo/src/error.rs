use thiserror::Error;

/// Errors surfaced by a geocoding backend.
#[derive(Error, Debug)]
pub enum GeoError {
    /// The geocoder answered but had no result for the query.
    #[error("No result for {0}")]
    NotFound(String),

    /// The request never produced a usable HTTP response.
    #[error("Geocoder unreachable: {0}")]
    Network(#[from] reqwest::Error),

    /// The geocoder answered with a failure status.
    #[error("Geocoder returned {status}: {message}")]
    Upstream { status: String, message: String },
}

pub type Result<T> = std::result::Result<T, GeoError>;
