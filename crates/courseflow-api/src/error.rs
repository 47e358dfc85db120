//! # Application Error
//!
//! Maps engine denials to structured HTTP responses. The body carries
//! the stable reason code next to the human message so callers can
//! branch on `reason` without parsing text; the status follows the
//! code's documented hint. Store failures carry no reason code and map
//! to 500 with an opaque message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use courseflow_engine::EngineError;

/// Application-level error type that maps to HTTP responses.
#[derive(Error, Debug)]
pub enum AppError {
    /// A business denial or store failure from the engine.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Request payload failed to parse into domain values.
    #[error("validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, reason, message) = match &self {
            AppError::Engine(err) => match err.reason_code() {
                Some(code) => (
                    StatusCode::from_u16(code.http_hint())
                        .unwrap_or(StatusCode::UNPROCESSABLE_ENTITY),
                    Some(code.as_str()),
                    err.to_string(),
                ),
                None => {
                    tracing::error!(error = %err, "store failure");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        None,
                        "internal error".to_string(),
                    )
                }
            },
            AppError::Validation(message) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                None,
                message.clone(),
            ),
        };
        let body = serde_json::json!({
            "error": {
                "code": status.as_u16(),
                "reason": reason,
                "message": message,
            }
        });
        (status, axum::Json(body)).into_response()
    }
}
