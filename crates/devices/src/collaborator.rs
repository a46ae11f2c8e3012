//! Collaborator interfaces consumed by the relay session.

use async_trait::async_trait;
use thiserror::Error;

use cubelink_core::{ModeName, TelemetrySample};

/// Result type for device operations.
pub type DeviceResult<T> = Result<T, DeviceError>;

/// Error type for collaborator operations.
///
/// None of these are fatal to the relay: a failed sample read is folded
/// into a null-field telemetry frame, and a failed uplink write is logged
/// without suppressing the ack.
#[derive(Debug, Error)]
pub enum DeviceError {
    /// Transport failure toward the device bridge.
    #[error("I/O error: {0}")]
    Io(String),

    /// Downlink line did not match the expected shape.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The device has no data or is not running.
    #[error("Device unavailable: {0}")]
    Unavailable(String),
}

/// Source of point-in-time sensor readings.
///
/// Called once per telemetry publish tick; implementations must not block
/// indefinitely.
#[async_trait]
pub trait TelemetrySource: Send + Sync {
    async fn read_sensor_data(&self) -> DeviceResult<TelemetrySample>;
}

/// Sink accepting a validated mode change for forwarding to the remote
/// device. Fire-and-forget with best-effort delivery.
#[async_trait]
pub trait UplinkSink: Send + Sync {
    async fn send_uplink_command(&self, mode: ModeName) -> DeviceResult<()>;
}
