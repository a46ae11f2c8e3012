//! Unified error handling for CubeLink.
//!
//! This module provides a common error type used across all crates,
//! keeping error handling consistent between the relay and the device layer.

/// Unified error type for CubeLink.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Protocol-level errors (bad frames, schema mismatches).
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// Command queue errors.
    #[error("Queue error: {0}")]
    Queue(String),

    /// Device/collaborator errors.
    #[error("Device error: {0}")]
    Device(String),

    /// Transport-level errors (socket closed, send failure).
    #[error("Transport error: {0}")]
    Transport(String),

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience.
pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
