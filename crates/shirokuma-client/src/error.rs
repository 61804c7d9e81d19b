//! Error types for the GraphQL client

use thiserror::Error;

/// GraphQL client error
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Server returned a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// Node answered with a GraphQL `errors` array
    #[error("GraphQL error: {0}")]
    GraphQl(String),

    /// Response did not carry the expected field
    #[error("Response doesn't contain field `{0}`")]
    MissingField(&'static str),

    /// Client could not be configured
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
