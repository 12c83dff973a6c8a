//! Client error types

use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// In-process or otherwise non-HTTP transport failure
    #[error("Transport error: {0}")]
    Transport(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A read returned a non-success status
    #[error("Request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The operation needs a persisted entity
    #[error("Entity has not been created yet")]
    NotPersisted,

    /// Nothing to address the resource with
    #[error("Missing resource location: {0}")]
    MissingLocation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
