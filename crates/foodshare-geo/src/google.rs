//! [`LocationResolver`] backed by the Google Geocoding HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use foodshare_shared::constants::{
    ADDRESS_NOT_AVAILABLE, DEFAULT_GEOCODER_TIMEOUT_SECS, DEFAULT_GEOCODER_URL, NO_ADDRESS_FOUND,
    UNKNOWN_LOCATION,
};
use foodshare_shared::GeoPoint;

use crate::error::{GeoError, Result};
use crate::resolver::LocationResolver;
use crate::response::GeocodeResponse;

/// Connection settings for [`GoogleGeocoder`].
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Endpoint answering `?latlng=` and `?address=` queries.
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_GEOCODER_URL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_secs(DEFAULT_GEOCODER_TIMEOUT_SECS),
        }
    }
}

#[derive(Clone)]
pub struct GoogleGeocoder {
    client: Client,
    config: GeocoderConfig,
}

impl GoogleGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// Issue one geocoding request with the given query pair.
    async fn lookup(&self, param: &str, value: &str) -> Result<GeocodeResponse> {
        let resp = self
            .client
            .get(&self.config.base_url)
            .query(&[(param, value), ("key", self.config.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?;

        let body: GeocodeResponse = resp.json().await?;
        debug!(param, status = %body.status, results = body.results.len(), "geocoder answered");
        body.check()
    }

    async fn reverse(&self, point: GeoPoint) -> Result<GeocodeResponse> {
        self.lookup("latlng", &point.to_string()).await
    }
}

#[async_trait]
impl LocationResolver for GoogleGeocoder {
    async fn resolve_address(&self, point: GeoPoint) -> String {
        match self.reverse(point).await {
            Ok(resp) => resp
                .first_address()
                .unwrap_or(NO_ADDRESS_FOUND)
                .to_string(),
            Err(e) => {
                warn!(%point, error = %e, "reverse geocoding failed");
                ADDRESS_NOT_AVAILABLE.to_string()
            }
        }
    }

    async fn resolve_coordinates(&self, address: &str) -> Result<GeoPoint> {
        let resp = self.lookup("address", address).await?;
        resp.first_point()
            .ok_or_else(|| GeoError::NotFound(address.to_string()))
    }

    async fn resolve_locality(&self, point: GeoPoint) -> String {
        match self.reverse(point).await {
            Ok(resp) => resp.city().unwrap_or(UNKNOWN_LOCATION).to_string(),
            Err(e) => {
                warn!(%point, error = %e, "locality lookup failed");
                UNKNOWN_LOCATION.to_string()
            }
        }
    }
}
