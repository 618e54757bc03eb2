use std::sync::Arc;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{header, Method, StatusCode},
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use uuid::Uuid;

use foodshare_core::{
    CreatedItem, FeedbackDraft, FeedbackService, ItemCatalog, ItemFilter, ItemImage, ItemListing,
    ItemUpdate, NewItem, ProfileService, Registration, ReservationDetail, ReservationLedger,
    ServiceError,
};
use foodshare_geo::LocationResolver;
use foodshare_shared::{GeoPoint, ItemId, ReservationId};
use foodshare_store::{Feedback, ReceiverDetails, Reservation, UserProfile};

use crate::blob_store::{sniff_content_type, BlobStore};
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::identity::{Caller, GatewayUser, SignedIn};
use crate::rate_limit::{rate_limit_middleware, RateLimiter};

/// Headroom for the non-image multipart fields.
const FORM_OVERHEAD: usize = 64 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ItemCatalog>,
    pub ledger: Arc<ReservationLedger>,
    pub profiles: Arc<ProfileService>,
    pub feedback: Arc<FeedbackService>,
    pub resolver: Arc<dyn LocationResolver>,
    pub blob_store: Arc<BlobStore>,
    pub rate_limiter: RateLimiter,
    pub config: Arc<ServerConfig>,
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(
            "/profile",
            post(register_profile).get(get_profile).put(update_profile),
        )
        .route("/items", post(create_item).get(list_items))
        .route("/items/mine", get(list_donations))
        .route("/items/:id", get(get_item).put(update_item))
        .route("/items/:id/reserve", post(reserve_item))
        .route("/reservations/open", get(list_open_slots))
        .route("/reservations/history", get(list_history))
        .route("/reservations/mine", get(list_my_reservations))
        .route("/reservations/:id", get(get_reservation))
        .route("/reservations/:id/claim", post(claim_slot))
        .route("/reservations/:id/complete", post(complete_delivery))
        .route("/images/*key", get(get_image))
        .route("/geocode", get(geocode))
        .route("/feedback", post(submit_feedback))
        .layer(DefaultBodyLimit::max(
            state.config.max_image_size + FORM_OVERHEAD,
        ))
        .layer(middleware::from_fn_with_state(
            state.rate_limiter.clone(),
            rate_limit_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// A profile plus the home screen its role routes to.
#[derive(Serialize)]
struct ProfileResponse {
    #[serde(flatten)]
    profile: UserProfile,
    home_route: &'static str,
}

impl From<UserProfile> for ProfileResponse {
    fn from(profile: UserProfile) -> Self {
        Self {
            home_route: profile.role.home_route(),
            profile,
        }
    }
}

#[derive(Deserialize)]
struct ProfileUpdate {
    first_name: Option<String>,
    last_name: Option<String>,
}

async fn register_profile(
    State(state): State<AppState>,
    GatewayUser(user_id): GatewayUser,
    Json(reg): Json<Registration>,
) -> Result<(StatusCode, Json<ProfileResponse>), ServerError> {
    let profile = state.profiles.register_profile(&user_id, reg)?;
    Ok((StatusCode::CREATED, Json(profile.into())))
}

async fn get_profile(
    State(state): State<AppState>,
    GatewayUser(user_id): GatewayUser,
) -> Result<Json<ProfileResponse>, ServerError> {
    Ok(Json(state.profiles.get_profile(&user_id)?.into()))
}

async fn update_profile(
    State(state): State<AppState>,
    GatewayUser(user_id): GatewayUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<ProfileResponse>, ServerError> {
    let profile = state.profiles.update_profile(
        &user_id,
        update.first_name.as_deref(),
        update.last_name.as_deref(),
    )?;
    Ok(Json(profile.into()))
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Multipart form: `name`, `description`, optional `latitude` + `longitude`,
/// optional `image` file.
async fn create_item(
    State(state): State<AppState>,
    Caller(caller): Caller,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<CreatedItem>), ServerError> {
    let mut name = String::new();
    let mut description = String::new();
    let mut latitude: Option<f64> = None;
    let mut longitude: Option<f64> = None;
    let mut image: Option<ItemImage> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "image" => {
                let content_type = field.content_type().map(str::to_string);
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Failed to read image: {}", e)))?;
                if data.len() > state.blob_store.max_size() {
                    return Err(ServerError::ImageTooLarge {
                        size: data.len(),
                        max: state.blob_store.max_size(),
                    });
                }
                if !data.is_empty() {
                    image = Some(ItemImage {
                        bytes: data,
                        content_type,
                    });
                }
            }
            "name" | "description" | "latitude" | "longitude" => {
                let text = field.text().await.map_err(|e| {
                    ServerError::BadRequest(format!("Failed to read {field_name}: {e}"))
                })?;
                match field_name.as_str() {
                    "name" => name = text,
                    "description" => description = text,
                    "latitude" => latitude = Some(parse_coordinate("latitude", &text)?),
                    _ => longitude = Some(parse_coordinate("longitude", &text)?),
                }
            }
            _ => {}
        }
    }

    let location = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Some(point(lat, lon)?),
        (None, None) => None,
        _ => {
            return Err(ServerError::BadRequest(
                "latitude and longitude must be given together".into(),
            ))
        }
    };

    let created = state
        .catalog
        .create_item(
            &caller,
            NewItem {
                name,
                description,
                location,
                image,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(created)))
}

async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ItemFilter>,
) -> Result<Json<Vec<ItemListing>>, ServerError> {
    Ok(Json(state.catalog.list_items(&filter).await?))
}

async fn list_donations(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Vec<ItemListing>>, ServerError> {
    Ok(Json(state.catalog.list_donations(&caller).await?))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ItemListing>, ServerError> {
    Ok(Json(state.catalog.get_item(ItemId(id)).await?))
}

async fn update_item(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(update): Json<ItemUpdate>,
) -> Result<Json<ItemListing>, ServerError> {
    Ok(Json(
        state.catalog.update_item(&caller, ItemId(id), update).await?,
    ))
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ReserveRequest {
    #[serde(flatten)]
    receiver: ReceiverDetails,
    #[serde(default)]
    receiver_location: Option<GeoPoint>,
}

async fn reserve_item(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
    Json(req): Json<ReserveRequest>,
) -> Result<(StatusCode, Json<Reservation>), ServerError> {
    let reservation = state
        .ledger
        .reserve_item(&caller, ItemId(id), req.receiver, req.receiver_location)
        .await?;
    Ok((StatusCode::CREATED, Json(reservation)))
}

async fn list_open_slots(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
) -> Result<Json<Vec<Reservation>>, ServerError> {
    Ok(Json(state.ledger.list_open_slots(&user)?))
}

#[derive(Deserialize)]
struct HistoryQuery {
    /// Only reservations the caller takes part in.  Non-riders always get
    /// this view.
    #[serde(default)]
    mine: bool,
}

async fn list_history(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Query(q): Query<HistoryQuery>,
) -> Result<Json<Vec<Reservation>>, ServerError> {
    Ok(Json(
        state.ledger.list_completed_or_delivering(&user, q.mine)?,
    ))
}

async fn list_my_reservations(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<Vec<Reservation>>, ServerError> {
    Ok(Json(state.ledger.list_for_receiver(&caller)?))
}

async fn get_reservation(
    State(state): State<AppState>,
    SignedIn(user): SignedIn,
    Path(id): Path<Uuid>,
) -> Result<Json<ReservationDetail>, ServerError> {
    Ok(Json(
        state
            .ledger
            .reservation_detail(&user, ReservationId(id))
            .await?,
    ))
}

async fn claim_slot(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ServerError> {
    Ok(Json(
        state
            .ledger
            .claim_delivery_slot(&caller, ReservationId(id))
            .await?,
    ))
}

async fn complete_delivery(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<Reservation>, ServerError> {
    Ok(Json(
        state
            .ledger
            .complete_delivery(&caller, ReservationId(id))
            .await?,
    ))
}

// ---------------------------------------------------------------------------
// Images, geocoding, feedback
// ---------------------------------------------------------------------------

async fn get_image(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ServerError> {
    let data = state.blob_store.get_image(&key).await?;
    Ok(([(header::CONTENT_TYPE, sniff_content_type(&data))], data))
}

#[derive(Deserialize)]
struct GeocodeQuery {
    lat: Option<f64>,
    lon: Option<f64>,
    address: Option<String>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum GeocodeResponse {
    Reverse { address: String, locality: String },
    Forward { latitude: f64, longitude: f64 },
}

/// `?lat=&lon=` resolves an address and city; `?address=` resolves a point.
async fn geocode(
    State(state): State<AppState>,
    Query(q): Query<GeocodeQuery>,
) -> Result<Json<GeocodeResponse>, ServerError> {
    match (q.lat, q.lon, q.address) {
        (Some(lat), Some(lon), _) => {
            let p = point(lat, lon)?;
            let (address, locality) = futures::join!(
                state.resolver.resolve_address(p),
                state.resolver.resolve_locality(p),
            );
            Ok(Json(GeocodeResponse::Reverse { address, locality }))
        }
        (None, None, Some(address)) if !address.trim().is_empty() => {
            let p = state
                .resolver
                .resolve_coordinates(address.trim())
                .await
                .map_err(ServiceError::from)?;
            Ok(Json(GeocodeResponse::Forward {
                latitude: p.latitude,
                longitude: p.longitude,
            }))
        }
        _ => Err(ServerError::BadRequest(
            "give either lat and lon, or address".into(),
        )),
    }
}

async fn submit_feedback(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Json(draft): Json<FeedbackDraft>,
) -> Result<(StatusCode, Json<Feedback>), ServerError> {
    let feedback = state.feedback.submit_feedback(&caller, draft)?;
    Ok((StatusCode::CREATED, Json(feedback)))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_coordinate(field: &str, raw: &str) -> Result<f64, ServerError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| ServerError::BadRequest(format!("{field}: {e}")))
}

fn point(lat: f64, lon: f64) -> Result<GeoPoint, ServerError> {
    GeoPoint::new(lat, lon).map_err(|e| ServerError::BadRequest(e.to_string()))
}

pub async fn serve(state: AppState, addr: std::net::SocketAddr) -> anyhow::Result<()> {
    let app = build_router(state);

    info!(addr = %addr, "Starting HTTP API server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
