//! Custom error types for the gateway

use common::StorageError;
use thiserror::Error;

/// Custom error type for gateway callers
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The backend answered with a non-2xx status
    #[error("{message}")]
    Http { status: u16, message: String },

    /// No HTTP response reached the client
    #[error("{0}")]
    Transport(String),

    /// A 2xx body could not be decoded into the expected shape
    #[error("Invalid response body: {0}")]
    Decode(String),

    /// Session storage failed
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// Input was rejected before any request was made
    #[error("{0}")]
    Validation(String),
}

impl GatewayError {
    /// HTTP status attached to the error, `0` when no response was received
    pub fn status(&self) -> u16 {
        match self {
            GatewayError::Http { status, .. } => *status,
            _ => 0,
        }
    }

    /// Whether the backend rejected the session token
    pub fn is_unauthorized(&self) -> bool {
        self.status() == 401
    }
}

/// Type alias for gateway results
pub type GatewayResult<T> = Result<T, GatewayError>;
