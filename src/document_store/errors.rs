//! # Document Store Errors

use thiserror::Error;

use super::Table;

/// Result type for document store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Document store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Document not found: {table}/{id}")]
    DocumentNotFound { table: Table, id: String },

    #[error("Document already exists: {table}/{id}")]
    DocumentExists { table: Table, id: String },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            StoreError::DocumentNotFound { .. } => 404,
            StoreError::DocumentExists { .. } => 409,
            StoreError::InvalidDocument(_) => 400,
            StoreError::Internal(_) => 500,
        }
    }
}
