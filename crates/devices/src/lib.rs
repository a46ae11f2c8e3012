//! External collaborators for the CubeLink relay.
//!
//! The relay core only knows two capabilities: reading a telemetry sample
//! and forwarding a validated mode change toward the remote device. This
//! crate defines those interfaces and a simulated transceiver that stands
//! in for the serial-bridged radio hardware.

pub mod collaborator;
pub mod transceiver;

pub use collaborator::{DeviceError, DeviceResult, TelemetrySource, UplinkSink};
pub use transceiver::{SimulatedTransceiver, TransceiverConfig};
