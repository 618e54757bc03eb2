//! Geocoding for Foodshare: turning coordinates into human-readable addresses
//! and city labels, and addresses back into coordinates.
//!
//! Callers depend on the [`LocationResolver`] trait; [`GoogleGeocoder`] is the
//! production implementation over the Google Geocoding JSON API.

pub mod error;
pub mod google;
pub mod resolver;
pub mod response;

pub use error::GeoError;
pub use google::{GeocoderConfig, GoogleGeocoder};
pub use resolver::LocationResolver;
