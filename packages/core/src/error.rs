//! Error types for the core layer.

use thiserror::Error;

use crate::path::{Path, PathError};

/// Errors reported by a database client through its callbacks.
///
/// The client helpers surface these to their callers unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Access rules refused the operation.
    #[error("permission denied at '{path}'")]
    PermissionDenied { path: Path },

    /// The location, or a key inside the written data, is not valid.
    #[error(transparent)]
    InvalidPath(#[from] PathError),

    /// The written data cannot be stored.
    #[error("invalid data: {message}")]
    InvalidData { message: String },

    /// An optimistic transaction kept losing to concurrent writers.
    #[error("transaction at '{path}' gave up after {attempts} attempts")]
    MaxRetries { path: Path, attempts: u32 },

    /// The client lost its connection before the operation completed.
    #[error("disconnected")]
    Disconnected,

    /// Any other client failure.
    #[error("{message}")]
    Other { message: String },
}

impl ClientError {
    /// Create an `Other` error from any message.
    pub fn other(message: impl Into<String>) -> Self {
        ClientError::Other {
            message: message.into(),
        }
    }
}

/// Errors converting between [`crate::Value`] and Rust types.
#[derive(Debug, Error)]
pub enum Error {
    /// The value does not deserialize into the requested type.
    #[error("decode error: {message}")]
    Decode { message: String },

    /// The Rust value cannot be represented as a stored value.
    #[error("encode error: {message}")]
    Encode { message: String },
}

impl Error {
    /// Create a decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Error::Decode {
            message: message.into(),
        }
    }

    /// Create an encode error.
    pub fn encode(message: impl Into<String>) -> Self {
        Error::Encode {
            message: message.into(),
        }
    }
}
