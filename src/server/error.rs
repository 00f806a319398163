// Server Errors - Maps failures onto HTTP responses
// Every error body is `{"error": ..., "status": ...}`

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::core::error::TelemetryError;

#[derive(Debug, Error)]
pub enum AppError {
    /// 404
    #[error("Not found: {0}")]
    NotFound(String),

    /// 400
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// 500
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<TelemetryError> for AppError {
    fn from(err: TelemetryError) -> Self {
        match err {
            TelemetryError::EmptyHistory => AppError::NotFound("no episodes recorded yet".to_string()),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = axum::Json(json!({
            "error": message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
