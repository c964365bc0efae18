//! Error types for wvbridge

use thiserror::Error;

/// Result type alias for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Error type for bridge operations
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Bridge is not in a valid state for the requested operation
    #[error("invalid bridge state: expected {expected}, got {actual}")]
    InvalidState { expected: String, actual: String },

    /// Attempt to bind or unbind the reserved call-response event
    #[error("{0} eventName is reserved for internal use")]
    ReservedEventName(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The transport failed to execute an instruction
    #[error("transport error: {0}")]
    TransportError(String),

    /// The remote peer answered a call with an error
    #[error("remote call failed: {0}")]
    RemoteCall(serde_json::Value),

    /// The bridge was destroyed before the operation completed
    #[error("bridge destroyed")]
    Destroyed,

    /// Async runtime error
    #[error("runtime error: {0}")]
    RuntimeError(String),
}

impl From<serde_json::Error> for BridgeError {
    fn from(err: serde_json::Error) -> Self {
        BridgeError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
