//! Request identity.
//!
//! Users authenticate at an upstream gateway, which forwards the user id in
//! `x-user-id` together with a shared secret in `x-gateway-token`.  The id is
//! trusted only when the secret matches; the role comes from the stored
//! profile, never from the request.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use subtle::ConstantTimeEq;

use foodshare_core::ServiceError;
use foodshare_shared::{AuthenticatedUser, UserId};

use crate::api::AppState;
use crate::error::ServerError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const GATEWAY_TOKEN_HEADER: &str = "x-gateway-token";

/// The gateway-authenticated user id, with no profile required.  Used by the
/// profile routes, where the profile may not exist yet.
#[derive(Debug, Clone)]
pub struct GatewayUser(pub UserId);

/// The caller as the services see them: `None` when no user id was sent.
#[derive(Debug, Clone)]
pub struct Caller(pub Option<AuthenticatedUser>);

/// A caller with a registered profile.  Anonymous requests get `401`.
#[derive(Debug, Clone)]
pub struct SignedIn(pub AuthenticatedUser);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Check the gateway secret (if configured) and return the forwarded user id.
fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<Option<UserId>, ServerError> {
    let Some(user_id) = header(headers, USER_ID_HEADER) else {
        return Ok(None);
    };

    if let Some(expected) = state.config.gateway_token.as_deref() {
        let token = header(headers, GATEWAY_TOKEN_HEADER).unwrap_or("");

        // Constant-time comparison to prevent timing attacks on the gateway secret.
        let token_bytes = token.as_bytes();
        let expected_bytes = expected.as_bytes();
        if token_bytes.len() != expected_bytes.len()
            || token_bytes.ct_eq(expected_bytes).unwrap_u8() != 1
        {
            return Err(ServerError::Unauthorized("Invalid gateway token".into()));
        }
    }

    Ok(Some(UserId::new(user_id)))
}

#[async_trait]
impl FromRequestParts<AppState> for GatewayUser {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        authenticate(&parts.headers, state)?
            .map(GatewayUser)
            .ok_or_else(|| ServerError::Unauthorized(format!("Missing {USER_ID_HEADER} header")))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Caller {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(user_id) = authenticate(&parts.headers, state)? else {
            return Ok(Caller(None));
        };

        match state.profiles.get_profile(&user_id) {
            Ok(profile) => Ok(Caller(Some(AuthenticatedUser {
                id: profile.user_id,
                role: profile.role,
            }))),
            Err(ServiceError::NotFound(_)) => Err(ServiceError::Forbidden(
                "register a profile before using the service".into(),
            )
            .into()),
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for SignedIn {
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match Caller::from_request_parts(parts, state).await? {
            Caller(Some(user)) => Ok(SignedIn(user)),
            Caller(None) => Err(ServerError::Unauthorized(format!(
                "Missing {USER_ID_HEADER} header"
            ))),
        }
    }
}
