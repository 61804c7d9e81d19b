//! Error types for the shirokuma SDK

use shirokuma_client::ClientError;
use thiserror::Error;

/// Result type for SDK operations
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK error types
#[derive(Error, Debug)]
pub enum SdkError {
    /// A required parameter is missing or empty
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// No key pair or schema id available, or the session cannot be set up
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Query or mutation against the node failed
    #[error("Transport error: {0}")]
    Transport(#[from] ClientError),

    /// The encoding or signing capability failed
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Document has no field with this name
    #[error("Field not found: {0}")]
    FieldNotFound(String),
}

impl From<serde_json::Error> for SdkError {
    fn from(err: serde_json::Error) -> Self {
        SdkError::Encoding(err.to_string())
    }
}

impl From<hex::FromHexError> for SdkError {
    fn from(err: hex::FromHexError) -> Self {
        SdkError::Encoding(err.to_string())
    }
}
