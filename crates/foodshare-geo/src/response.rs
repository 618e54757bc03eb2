//! Wire format of the Google Geocoding JSON API.
//!
//! Only the fields Foodshare reads are modelled; everything else is ignored
//! by serde.

use serde::Deserialize;

use foodshare_shared::GeoPoint;

use crate::error::{GeoError, Result};

/// Top-level geocoding answer.
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResponse {
    pub status: String,
    #[serde(default)]
    pub results: Vec<GeocodeResult>,
    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: String,
    #[serde(default)]
    pub address_components: Vec<AddressComponent>,
    pub geometry: Option<Geometry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddressComponent {
    pub long_name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub types: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

/// Component types accepted as a city label, in either order of appearance.
const CITY_TYPES: [&str; 2] = ["locality", "administrative_area_level_1"];

impl GeocodeResponse {
    /// Turn a failure status into an error.  `ZERO_RESULTS` is a successful
    /// answer with an empty result list.
    pub fn check(self) -> Result<Self> {
        match self.status.as_str() {
            "OK" | "ZERO_RESULTS" => Ok(self),
            _ => Err(GeoError::Upstream {
                message: self
                    .error_message
                    .clone()
                    .unwrap_or_else(|| "no message".to_string()),
                status: self.status,
            }),
        }
    }

    pub fn first(&self) -> Option<&GeocodeResult> {
        self.results.first()
    }

    pub fn first_address(&self) -> Option<&str> {
        self.first()
            .map(|r| r.formatted_address.as_str())
            .filter(|a| !a.is_empty())
    }

    pub fn first_point(&self) -> Option<GeoPoint> {
        let loc = self.first()?.geometry.as_ref()?.location;
        GeoPoint::new(loc.lat, loc.lng).ok()
    }

    /// The first component of the first result typed as a city or state.
    pub fn city(&self) -> Option<&str> {
        self.first()?
            .address_components
            .iter()
            .find(|c| c.types.iter().any(|t| CITY_TYPES.contains(&t.as_str())))
            .map(|c| c.long_name.as_str())
    }
}
