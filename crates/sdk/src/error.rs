//! SDK Error Types

use thiserror::Error;

/// SDK Result type
pub type Result<T> = std::result::Result<T, SdkError>;

/// SDK Error
#[derive(Debug, Error)]
pub enum SdkError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({status} {kind}): {message}")]
    Rpc {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

impl SdkError {
    /// HTTP status of a server-side rejection
    pub fn status(&self) -> Option<u16> {
        match self {
            SdkError::Rpc { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for SdkError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_connect() {
            SdkError::Connection(e.to_string())
        } else if e.is_builder() {
            SdkError::InvalidUrl(e.to_string())
        } else {
            SdkError::Transport(e.to_string())
        }
    }
}
