//! Error handling

use std::time::Duration;
use thiserror::Error;

/// Unified error type for the client
#[derive(Error, Debug)]
pub enum ClientError {
    /// Operation kind outside the supported set
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Required parameter absent from the batch item
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// Parameter present but unusable for the active operation
    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name as supplied by the caller
        name: String,
        /// What went wrong
        message: String,
    },

    /// Transport call exceeded the item's timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Connection-level failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the remote API
    #[error("API error: HTTP {status}: {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body as text
        message: String,
    },

    /// Error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Client result type
pub type Result<T> = std::result::Result<T, ClientError>;

impl ClientError {
    /// Whether the error was raised while compiling a request,
    /// before anything was sent over the wire.
    pub fn is_compile_error(&self) -> bool {
        matches!(
            self,
            ClientError::UnknownOperation(_)
                | ClientError::MissingParameter(_)
                | ClientError::InvalidParameter { .. }
        )
    }

    /// Whether the error came from the transport layer.
    pub fn is_transport_error(&self) -> bool {
        matches!(
            self,
            ClientError::Timeout(_) | ClientError::Network(_) | ClientError::Api { .. }
        )
    }
}
