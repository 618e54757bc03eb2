//! Server configuration loaded from environment variables.
//!
//! All settings have sensible defaults so the server can start with zero
//! configuration for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use foodshare_core::ImageUploadPolicy;
use foodshare_geo::GeocoderConfig;
use foodshare_shared::constants::{
    DEFAULT_GEOCODER_TIMEOUT_SECS, DEFAULT_GEOCODER_URL, DEFAULT_HTTP_PORT, MAX_IMAGE_SIZE,
};

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP API.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:8080`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `None` (platform data directory).
    pub database_path: Option<PathBuf>,

    /// Directory where item images are written.
    /// Env: `BLOB_STORAGE_PATH`
    /// Default: `./images`
    pub blob_storage_path: PathBuf,

    /// Largest accepted image, in bytes.
    /// Env: `MAX_IMAGE_SIZE`
    /// Default: 10 MiB
    pub max_image_size: usize,

    /// Prefix of image URLs handed back to clients.
    /// Env: `PUBLIC_BASE_URL`
    /// Default: `http://localhost:8080`
    pub public_base_url: String,

    /// Env: `GOOGLE_MAPS_API_KEY`
    pub google_maps_api_key: String,

    /// Env: `GEOCODER_BASE_URL`
    pub geocoder_base_url: String,

    /// Env: `GEOCODER_TIMEOUT_SECS`
    pub geocoder_timeout: Duration,

    /// Shared secret the auth gateway sends in `x-gateway-token`.
    /// Env: `GATEWAY_TOKEN`
    /// Default: unset, which trusts `x-user-id` from any client (development only).
    pub gateway_token: Option<String>,

    /// Env: `IMAGE_UPLOAD_POLICY` (`tolerate` | `require`)
    /// Default: `tolerate`
    pub image_upload_policy: ImageUploadPolicy,

    /// Endpoint receiving reservation transition notifications as JSON.
    /// Env: `NOTIFY_WEBHOOK_URL`
    /// Default: unset (notifications are only logged).
    pub notify_webhook_url: Option<String>,

    /// Sustained requests per second per client IP.
    /// Env: `RATE_LIMIT_PER_SEC`
    pub rate_limit_per_sec: f64,

    /// Burst allowance per client IP.
    /// Env: `RATE_LIMIT_BURST`
    pub rate_limit_burst: f64,
}

impl std::fmt::Debug for ServerConfig {
    // Secrets are reported as present/absent only.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("blob_storage_path", &self.blob_storage_path)
            .field("max_image_size", &self.max_image_size)
            .field("public_base_url", &self.public_base_url)
            .field("google_maps_api_key", &!self.google_maps_api_key.is_empty())
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_timeout", &self.geocoder_timeout)
            .field("gateway_token", &self.gateway_token.is_some())
            .field("image_upload_policy", &self.image_upload_policy)
            .field("notify_webhook_url", &self.notify_webhook_url)
            .field("rate_limit_per_sec", &self.rate_limit_per_sec)
            .field("rate_limit_burst", &self.rate_limit_burst)
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: None,
            blob_storage_path: PathBuf::from("./images"),
            max_image_size: MAX_IMAGE_SIZE,
            public_base_url: format!("http://localhost:{DEFAULT_HTTP_PORT}"),
            google_maps_api_key: String::new(),
            geocoder_base_url: DEFAULT_GEOCODER_URL.to_string(),
            geocoder_timeout: Duration::from_secs(DEFAULT_GEOCODER_TIMEOUT_SECS),
            gateway_token: None,
            image_upload_policy: ImageUploadPolicy::default(),
            notify_webhook_url: None,
            rate_limit_per_sec: 10.0,
            rate_limit_burst: 30.0,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        parse_into(&lookup, "HTTP_ADDR", &mut config.http_addr);

        if let Some(path) = non_empty(&lookup, "DATABASE_PATH") {
            config.database_path = Some(PathBuf::from(path));
        }

        if let Some(path) = non_empty(&lookup, "BLOB_STORAGE_PATH") {
            config.blob_storage_path = PathBuf::from(path);
        }

        parse_into(&lookup, "MAX_IMAGE_SIZE", &mut config.max_image_size);

        if let Some(url) = non_empty(&lookup, "PUBLIC_BASE_URL") {
            config.public_base_url = url.trim_end_matches('/').to_string();
        }

        if let Some(key) = non_empty(&lookup, "GOOGLE_MAPS_API_KEY") {
            config.google_maps_api_key = key;
        }

        if let Some(url) = non_empty(&lookup, "GEOCODER_BASE_URL") {
            config.geocoder_base_url = url;
        }

        let mut timeout_secs = config.geocoder_timeout.as_secs();
        parse_into(&lookup, "GEOCODER_TIMEOUT_SECS", &mut timeout_secs);
        config.geocoder_timeout = Duration::from_secs(timeout_secs);

        config.gateway_token = non_empty(&lookup, "GATEWAY_TOKEN");

        parse_into(&lookup, "IMAGE_UPLOAD_POLICY", &mut config.image_upload_policy);

        config.notify_webhook_url = non_empty(&lookup, "NOTIFY_WEBHOOK_URL");

        parse_into(&lookup, "RATE_LIMIT_PER_SEC", &mut config.rate_limit_per_sec);
        parse_into(&lookup, "RATE_LIMIT_BURST", &mut config.rate_limit_burst);

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    pub fn geocoder(&self) -> GeocoderConfig {
        GeocoderConfig {
            base_url: self.geocoder_base_url.clone(),
            api_key: self.google_maps_api_key.clone(),
            timeout: self.geocoder_timeout,
        }
    }
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key).filter(|v| !v.trim().is_empty())
}

/// Overwrite `target` with the parsed value of `key`; keep it and warn when
/// the value does not parse.
fn parse_into<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, target: &mut T)
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Some(raw) = non_empty(lookup, key) {
        match raw.trim().parse::<T>() {
            Ok(value) => *target = value,
            Err(e) => tracing::warn!(key, value = %raw, error = %e, "Invalid value, using default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> ServerConfig {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ServerConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = from_pairs(&[]);
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 8080).into());
        assert_eq!(config.max_image_size, 10 * 1024 * 1024);
        assert_eq!(config.image_upload_policy, ImageUploadPolicy::Tolerate);
        assert!(config.gateway_token.is_none());
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "127.0.0.1:9000"),
            ("DATABASE_PATH", "/var/lib/foodshare/db.sqlite"),
            ("PUBLIC_BASE_URL", "https://food.example.org/"),
            ("GATEWAY_TOKEN", "s3cret"),
            ("IMAGE_UPLOAD_POLICY", "require"),
            ("GEOCODER_TIMEOUT_SECS", "3"),
        ]);
        assert_eq!(config.http_addr, ([127, 0, 0, 1], 9000).into());
        assert_eq!(config.public_base_url, "https://food.example.org");
        assert_eq!(config.gateway_token.as_deref(), Some("s3cret"));
        assert_eq!(config.image_upload_policy, ImageUploadPolicy::Require);
        assert_eq!(config.geocoder().timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let config = from_pairs(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("MAX_IMAGE_SIZE", "huge"),
            ("IMAGE_UPLOAD_POLICY", "sometimes"),
            ("GATEWAY_TOKEN", "   "),
        ]);
        assert_eq!(config.http_addr, ServerConfig::default().http_addr);
        assert_eq!(config.max_image_size, MAX_IMAGE_SIZE);
        assert_eq!(config.image_upload_policy, ImageUploadPolicy::Tolerate);
        assert!(config.gateway_token.is_none());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = from_pairs(&[("GATEWAY_TOKEN", "s3cret"), ("GOOGLE_MAPS_API_KEY", "AIza")]);
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(!rendered.contains("AIza"));
    }
}
