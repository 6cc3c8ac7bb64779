//! # Media Errors

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::calendar::ErrorResponse;

/// Result type for media operations
pub type MediaResult<T> = Result<T, MediaError>;

/// Blob storage errors
#[derive(Debug, Clone, Error)]
pub enum MediaError {
    #[error("Media not found: {0}")]
    NotFound(String),

    #[error("Invalid media id: {0}")]
    InvalidId(String),

    #[error("I/O error: {0}")]
    IoError(String),
}

impl MediaError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            MediaError::NotFound(_) => StatusCode::NOT_FOUND,
            MediaError::InvalidId(_) => StatusCode::BAD_REQUEST,
            MediaError::IoError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for MediaError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
