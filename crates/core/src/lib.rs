//! Core types for the CubeLink relay.
//!
//! This crate defines the wire message schemas, the shared onboard state,
//! the command queue, and the unified error type used across the project.

pub mod config;
pub mod error;
pub mod message;
pub mod queue;
pub mod state;

pub use config::RelayConfig;
pub use error::{Error, Result};
pub use message::{
    AckStatus, Acknowledgment, InboundCommand, OutboundMessage, QueuedCommand, TelemetryMessage,
    TelemetrySample,
};
pub use queue::{CommandQueue, OverflowPolicy, QueueError};
pub use state::{ModeName, OnboardState};

/// Re-exports commonly used types.
pub mod prelude {
    pub use crate::config::RelayConfig;
    pub use crate::error::{Error, Result};
    pub use crate::message::{
        AckStatus, Acknowledgment, InboundCommand, OutboundMessage, QueuedCommand,
        TelemetryMessage, TelemetrySample,
    };
    pub use crate::queue::{CommandQueue, OverflowPolicy, QueueError};
    pub use crate::state::{ModeName, OnboardState};
}

/// Current wall-clock time as fractional epoch seconds.
pub fn epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

/// Current wall-clock time as epoch milliseconds.
pub fn epoch_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
