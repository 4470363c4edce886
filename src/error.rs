//! Error types for directory operations.

use crate::config::ConfigError;
use roster_search::SearchError;
use thiserror::Error;

/// Directory error type.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// The search service failed or rejected a request.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Configuration could not be loaded or is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Collection name rejected before any request was sent.
    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    /// Input file or output stream error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Record input could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for directory operations.
pub type Result<T> = std::result::Result<T, DirectoryError>;
