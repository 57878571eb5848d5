use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller-side input problem. Never retried; the caller must fix the input.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The requested transition is not allowed from the current stage
    /// (e.g. a second draft request while one is outstanding).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Any failure of the content generation provider. The message is surfaced verbatim.
    #[error("Generation error: {0}")]
    Generation(String),

    /// A single section's image could not be produced.
    #[error("Image generation error: {0}")]
    ImageGeneration(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The message shown to users, without the variant prefix.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Conflict(msg)
            | AppError::Generation(msg)
            | AppError::ImageGeneration(msg) => msg.clone(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Generation(msg) => {
                tracing::error!("Generation error: {msg}");
                (StatusCode::BAD_GATEWAY, "GENERATION_ERROR", msg.clone())
            }
            AppError::ImageGeneration(msg) => {
                tracing::warn!("Image generation error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "IMAGE_GENERATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
