use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use foodshare_core::ServiceError;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("Image too large: {size} bytes (max {max})")]
    ImageTooLarge { size: usize, max: usize },

    #[error("Image storage error: {0}")]
    ImageStorage(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Too many requests")]
    TooManyRequests,
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            ServerError::Service(e) => match e {
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
                ServiceError::Conflict(_) => StatusCode::CONFLICT,
                ServiceError::InvalidState(_) => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
                ServiceError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                ServiceError::Network(_) => StatusCode::BAD_GATEWAY,
            },
            ServerError::ImageNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::ImageTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::ImageStorage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ServerError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal details stay in the log.
        let message = match &self {
            ServerError::Service(ServiceError::Storage(detail))
            | ServerError::ImageStorage(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_errors_map_to_distinct_statuses() {
        let cases = [
            (ServiceError::Validation("x".into()), 400),
            (ServiceError::NotFound("x".into()), 404),
            (ServiceError::Conflict("x".into()), 409),
            (ServiceError::InvalidState("x".into()), 422),
            (ServiceError::Forbidden("x".into()), 403),
            (ServiceError::Storage("x".into()), 500),
            (ServiceError::Network("x".into()), 502),
        ];
        for (err, code) in cases {
            assert_eq!(ServerError::from(err).status().as_u16(), code);
        }
    }

    #[test]
    fn test_storage_detail_not_leaked() {
        let resp = ServerError::from(ServiceError::Storage("disk /var/x full".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
