//! # Calendar Errors
//!
//! Outcomes of calendar, period and reservation operations, with their HTTP
//! mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::document_store::{StoreError, Table};

/// Result type for calendar operations
pub type CalendarResult<T> = Result<T, CalendarError>;

/// Calendar service errors
#[derive(Debug, Clone, Error)]
pub enum CalendarError {
    // ==================
    // Client Errors (4xx)
    // ==================
    #[error("Invalid {field} '{value}': {reason}")]
    InvalidDate {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid request body: {message}")]
    InvalidBody { status: StatusCode, message: String },

    #[error("Window start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("{table} not found: {id}")]
    NotFound { table: Table, id: String },

    #[error("Calendar owner conflict: entity {0} exists")]
    OwnerExists(String),

    #[error("Requested window lies outside period {0}")]
    OutsidePeriod(String),

    #[error("No free period for the requested window")]
    NoFreePeriod,

    #[error("Could not create {table}: {reason}")]
    CreateConflict { table: Table, reason: String },

    #[error("{0}")]
    Store(#[from] StoreError),

    // ==================
    // Server Errors (5xx)
    // ==================
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CalendarError {
    pub fn not_found(table: Table, id: impl Into<String>) -> Self {
        CalendarError::NotFound {
            table,
            id: id.into(),
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            CalendarError::InvalidBody { status, .. } => *status,
            CalendarError::InvalidDate { .. } => StatusCode::BAD_REQUEST,
            CalendarError::InvalidWindow { .. } => StatusCode::BAD_REQUEST,

            CalendarError::NotFound { .. } => StatusCode::NOT_FOUND,

            CalendarError::OwnerExists(_) => StatusCode::CONFLICT,
            CalendarError::OutsidePeriod(_) => StatusCode::CONFLICT,
            CalendarError::NoFreePeriod => StatusCode::CONFLICT,
            CalendarError::CreateConflict { .. } => StatusCode::CONFLICT,

            CalendarError::Store(e) => {
                StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }

            CalendarError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Whether this is a 409 outcome
    pub fn is_conflict(&self) -> bool {
        self.status_code() == StatusCode::CONFLICT
    }
}

impl From<serde_json::Error> for CalendarError {
    fn from(e: serde_json::Error) -> Self {
        CalendarError::Serialization(e.to_string())
    }
}

impl From<JsonRejection> for CalendarError {
    fn from(rejection: JsonRejection) -> Self {
        CalendarError::InvalidBody {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl IntoResponse for CalendarError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
        });
        (status, body).into_response()
    }
}
