//! Error types for search operations.

use serde_json::Value;
use thiserror::Error;

/// Search error type.
#[derive(Error, Debug)]
pub enum SearchError {
    /// Transport could not be built.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Invalid input caught before a request was sent.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Index not found.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// Index already exists.
    #[error("Index already exists: {0}")]
    IndexExists(String),

    /// The service rejected a search, count or delete-by-query.
    #[error("Query error: {0}")]
    Query(String),

    /// Any other non-success response.
    #[error("Search service error ({status}): {reason}")]
    Internal {
        /// HTTP status code.
        status: u16,
        /// `error.reason` from the response body, when present.
        reason: String,
    },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Client error from the opensearch crate.
    #[error("Client error: {0}")]
    Client(#[from] opensearch::Error),
}

impl SearchError {
    /// Build an [`SearchError::Internal`] from a status and an error body.
    pub(crate) fn internal(status: u16, body: &Value) -> Self {
        SearchError::Internal {
            status,
            reason: error_reason(body, "Unknown error"),
        }
    }

    /// Whether the error came from a missing index.
    pub fn is_not_found(&self) -> bool {
        matches!(self, SearchError::IndexNotFound(_))
            || matches!(self, SearchError::Internal { status: 404, .. })
    }
}

/// Pull `error.reason` (or a string `error`) out of a response body.
pub(crate) fn error_reason(body: &Value, fallback: &str) -> String {
    body.get("error")
        .and_then(|e| e.get("reason").and_then(|r| r.as_str()).or_else(|| e.as_str()))
        .unwrap_or(fallback)
        .to_string()
}

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
