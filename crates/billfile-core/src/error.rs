//! Error types for billfile-core

use thiserror::Error;

/// Result type alias using billfile-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in billfile-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Sheet export fetch failed (non-2xx status or transport failure)
    #[error("Failed to fetch sheet data: {0}")]
    Fetch(String),

    /// HTTP transport error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Fetched body did not contain the expected embedded JSON table
    #[error("Invalid sheet response: {0}")]
    MalformedPayload(String),

    /// Local validation failure before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Remote write endpoint rejected or failed the submission
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}
