/// Returned by reverse geocoding when the upstream call fails
pub const ADDRESS_NOT_AVAILABLE: &str = "Address not available";

/// Returned by reverse geocoding when the upstream answers with no result
pub const NO_ADDRESS_FOUND: &str = "No address found";

/// Catalog label for items whose city cannot be resolved
pub const UNKNOWN_LOCATION: &str = "Unknown Location";

/// Location filter value that matches every label
pub const ALL_LOCATIONS: &str = "All";

/// Length of the delivery window that opens at reservation time
pub const DELIVERY_WINDOW_HOURS: i64 = 2;

/// Maximum accepted item image size in bytes (10 MiB)
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024;

/// Object store prefix for item images
pub const ITEM_IMAGE_PREFIX: &str = "items";

/// Display name stored for anonymous feedback
pub const ANONYMOUS_NAME: &str = "Anonymous";

/// Feedback rating bounds (inclusive)
pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// Default HTTP API port (server)
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Google Geocoding JSON endpoint
pub const DEFAULT_GEOCODER_URL: &str = "https://maps.googleapis.com/maps/api/geocode/json";

/// Geocoder request timeout in seconds
pub const DEFAULT_GEOCODER_TIMEOUT_SECS: u64 = 10;
