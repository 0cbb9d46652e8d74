// Central Error Types for the Router

use std::path::PathBuf;

use thiserror::Error;

/// Registry construction and lookup errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Invalid app/procedure naming or duplicate registration.
    /// Fatal at startup, never recovered.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Procedure not found: {0}")]
    NotFound(String),
}

/// Binding generation errors
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-request errors, converted to a response at the dispatch boundary
#[derive(Error, Debug)]
pub enum DispatchError {
    /// Empty or unparseable body
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Well-formed body that does not match the input type
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Output failed to serialize (programming error in the procedure)
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl DispatchError {
    /// HTTP status the error is surfaced with
    pub fn status(&self) -> u16 {
        match self {
            DispatchError::BadRequest(_) => 400,
            DispatchError::Decode(_) => 422,
            DispatchError::NotFound(_) => 404,
            DispatchError::Encoding(_) => 500,
        }
    }

    /// Stable machine-readable kind for the error envelope
    pub fn kind(&self) -> &'static str {
        match self {
            DispatchError::BadRequest(_) => "bad_request",
            DispatchError::Decode(_) => "decode",
            DispatchError::NotFound(_) => "not_found",
            DispatchError::Encoding(_) => "encoding",
        }
    }

    /// Message safe to send to the caller. Internal faults are not described.
    pub fn public_message(&self) -> String {
        match self {
            DispatchError::Encoding(_) => "internal error".to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status())
    }
}

/// Result type alias using RegistryError
pub type Result<T> = std::result::Result<T, RegistryError>;
