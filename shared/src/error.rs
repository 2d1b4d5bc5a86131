//! Error types for the heatmap Lambda.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while producing a heatmap.
///
/// Records with a missing or unparseable date and dates outside the
/// requested range are not errors; the aggregator skips them.
#[derive(Error, Debug)]
pub enum Error {
    /// Record source (Notion) query failed
    #[error("Record source unavailable: {0}")]
    Source(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// AWS SDK error
    #[error("AWS error: {0}")]
    Aws(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unsupported HTTP method
    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) => 400,
            Error::MethodNotAllowed(_) => 405,
            _ => 500,
        }
    }
}
