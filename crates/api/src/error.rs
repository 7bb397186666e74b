use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use fluxdeck_core::error::CoreError;
use fluxdeck_core::moderation;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses
/// of the shape `{ "error": <message>, "code": <CODE> }`; moderation
/// rejections additionally carry a structured `reasons` array.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `fluxdeck_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Moderation gets a structured body: one entry per reason with an
        // explanation and a suggestion.
        if let AppError::Core(CoreError::Moderation { ref reasons }) = self {
            let body = json!({
                "error": self.to_string(),
                "code": "MODERATED",
                "reasons": moderation::notices(reasons),
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(body)).into_response();
        }

        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                // The upstream-facing proxy endpoints keep a 400 contract
                // for missing credentials (not 401).
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Auth(msg) => (StatusCode::BAD_REQUEST, "AUTH_ERROR", msg.clone()),
                CoreError::Upstream { status, message } => (
                    propagated_status(*status),
                    "UPSTREAM_ERROR",
                    message.clone(),
                ),
                CoreError::Download { status, message } => (
                    propagated_status(*status),
                    "DOWNLOAD_ERROR",
                    message.clone(),
                ),
                CoreError::Generation(msg) => {
                    (StatusCode::BAD_GATEWAY, "GENERATION_FAILED", msg.clone())
                }
                CoreError::Timeout(msg) => {
                    (StatusCode::GATEWAY_TIMEOUT, "TIMEOUT", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Cancelled => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CANCELLED",
                    core.to_string(),
                ),
                CoreError::Storage(msg) => {
                    tracing::error!(error = %msg, "Storage error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "STORAGE_ERROR",
                        "An internal storage error occurred".to_string(),
                    )
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
                // Handled above; kept for exhaustiveness.
                CoreError::Moderation { .. } => unreachable!("moderation handled above"),
            },

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
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

/// Map an upstream status code to a response status.
///
/// Status 0 marks a transport-level failure that never produced an HTTP
/// status; that (or any out-of-range value) becomes 502.
fn propagated_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
