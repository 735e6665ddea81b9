use std::time::Duration;
use thiserror::Error;

use crate::wire::RpcErrorCode;

// Core RPC error types
#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("Schema violation: {0}")]
    SchemaViolation(String),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(#[from] std::string::FromUtf8Error),

    #[error("Request timeout after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("Call id mismatch: expected {expected}, got {actual}")]
    CallIdMismatch { expected: i32, actual: i32 },

    #[error("Remote error ({code:?}): {message}")]
    Remote { code: RpcErrorCode, message: String },

    #[error("Message size {size} exceeds maximum {max}")]
    MessageTooLarge { size: usize, max: usize },

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<rmp_serde::decode::Error> for RpcError {
    fn from(err: rmp_serde::decode::Error) -> Self {
        RpcError::Decode(err.to_string())
    }
}

impl RpcError {
    /// Hard failures of the byte pipeline, as opposed to errors the remote side reported.
    pub fn is_decode_failure(&self) -> bool {
        matches!(
            self,
            RpcError::Decode(_) | RpcError::SchemaViolation(_) | RpcError::InvalidIdentifier(_)
        )
    }
}
