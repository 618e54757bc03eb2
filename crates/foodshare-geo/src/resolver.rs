use async_trait::async_trait;

use foodshare_shared::GeoPoint;

use crate::error::Result;

/// Geocoding collaborator.
///
/// The two string-returning lookups never fail: collaborator trouble
/// degrades to the sentinel strings in `foodshare_shared::constants`, so
/// callers can show *something* next to every item.
#[async_trait]
pub trait LocationResolver: Send + Sync {
    /// Formatted street address for a coordinate.
    async fn resolve_address(&self, point: GeoPoint) -> String;

    /// Coordinate for a free-form address.
    async fn resolve_coordinates(&self, address: &str) -> Result<GeoPoint>;

    /// City (or state) name used to group items by location.
    async fn resolve_locality(&self, point: GeoPoint) -> String;
}
