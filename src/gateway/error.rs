use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

pub type GatewayResult<T> = std::result::Result<T, GatewayError>;

/// Gateway failure taxonomy, mapped onto HTTP statuses by [`IntoResponse`].
///
/// Validation, authorization, and configuration failures surface immediately
/// with a status code and a short message; nothing here is retried.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("device token is required")]
    MissingToken,

    #[error("api key is required")]
    MissingApiKey,

    #[error("invalid api key")]
    InvalidApiKey,

    #[error("subscription registry is not configured")]
    RegistryUnconfigured,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            GatewayError::MissingToken | GatewayError::MissingApiKey => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                self.to_string(),
            ),
            GatewayError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                self.to_string(),
            ),
            GatewayError::RegistryUnconfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                self.to_string(),
            ),
            GatewayError::Database(err) => {
                tracing::error!(error = %err, "registry write failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "an internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
