//! # foodshare-server
//!
//! HTTP service for the food-sharing network.
//!
//! This binary provides:
//! - **Item catalog**: donators list food, anyone can browse it by city
//! - **Reservation ledger**: receivers reserve items, riders claim and
//!   complete the deliveries
//! - **Image storage** on local disk, served back under `/images`
//! - **Geocoding** through the Google Geocoding API
//! - **Per-IP rate limiting** to protect against abuse

mod api;
mod blob_store;
mod config;
mod error;
mod identity;
mod notifier;
mod rate_limit;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use foodshare_core::{
    share, FeedbackService, ItemCatalog, LogNotifier, Notifier, ProfileService, ReservationLedger,
};
use foodshare_geo::{GoogleGeocoder, LocationResolver};
use foodshare_store::Database;

use crate::api::AppState;
use crate::blob_store::BlobStore;
use crate::config::ServerConfig;
use crate::notifier::WebhookNotifier;
use crate::rate_limit::RateLimiter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // -----------------------------------------------------------------------
    // 1. Initialize tracing (respects RUST_LOG env var)
    // -----------------------------------------------------------------------
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,foodshare_server=debug")),
        )
        .init();

    info!("Starting foodshare server v{}", env!("CARGO_PKG_VERSION"));

    // -----------------------------------------------------------------------
    // 2. Load configuration
    // -----------------------------------------------------------------------
    let config = ServerConfig::from_env();
    info!(?config, "Loaded configuration");

    if config.gateway_token.is_none() {
        warn!("GATEWAY_TOKEN is not set; x-user-id is trusted from any client");
    }
    if config.google_maps_api_key.is_empty() {
        warn!("GOOGLE_MAPS_API_KEY is not set; geocoding requests will be refused upstream");
    }

    // -----------------------------------------------------------------------
    // 3. Initialize subsystems
    // -----------------------------------------------------------------------
    let db = match &config.database_path {
        Some(path) => Database::open_at(path)?,
        None => Database::new()?,
    };
    let db = share(db);

    let resolver: Arc<dyn LocationResolver> = Arc::new(GoogleGeocoder::new(config.geocoder())?);

    // Image store (creates directory if missing)
    let blob_store = Arc::new(
        BlobStore::new(
            config.blob_storage_path.clone(),
            config.max_image_size,
            config.public_base_url.clone(),
        )
        .await?,
    );

    let notifier: Arc<dyn Notifier> = match &config.notify_webhook_url {
        Some(url) => {
            info!(url = %url, "Delivering notifications to webhook");
            Arc::new(WebhookNotifier::new(url.clone())?)
        }
        None => Arc::new(LogNotifier),
    };

    let rate_limiter = RateLimiter::new(config.rate_limit_per_sec, config.rate_limit_burst);

    let app_state = AppState {
        catalog: Arc::new(
            ItemCatalog::new(db.clone(), blob_store.clone(), resolver.clone())
                .with_image_policy(config.image_upload_policy),
        ),
        ledger: Arc::new(ReservationLedger::new(
            db.clone(),
            resolver.clone(),
            notifier,
        )),
        profiles: Arc::new(ProfileService::new(db.clone())),
        feedback: Arc::new(FeedbackService::new(db)),
        resolver,
        blob_store,
        rate_limiter: rate_limiter.clone(),
        config: Arc::new(config.clone()),
    };

    // -----------------------------------------------------------------------
    // 4. Spawn background tasks
    // -----------------------------------------------------------------------
    rate_limiter.spawn_purge();

    // -----------------------------------------------------------------------
    // 5. Run the HTTP API server (blocks until shutdown)
    // -----------------------------------------------------------------------
    tokio::select! {
        result = api::serve(app_state, config.http_addr) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server failed");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down");
        }
    }

    Ok(())
}
