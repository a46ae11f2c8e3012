//! Server state and types.

use std::sync::Arc;

use tokio::sync::RwLock;

use cubelink_core::{OnboardState, RelayConfig};
use cubelink_devices::{SimulatedTransceiver, TelemetrySource, TransceiverConfig, UplinkSink};

/// Server state shared across all handlers.
///
/// The relay is single-session by design: `onboard` is the mode register
/// of the active session, reset to IDLE whenever a new ground connection
/// is accepted. The command queue lives inside the session, not here.
#[derive(Clone)]
pub struct ServerState {
    /// Onboard mode register, owned by the active session.
    pub onboard: Arc<RwLock<OnboardState>>,
    /// Telemetry source collaborator.
    pub telemetry: Arc<dyn TelemetrySource>,
    /// Uplink sink collaborator.
    pub uplink: Arc<dyn UplinkSink>,
    /// Relay tunables applied to each session.
    pub relay_config: RelayConfig,
    /// Server start timestamp (epoch seconds).
    pub started_at: i64,
}

impl ServerState {
    /// Create server state with injected collaborators.
    pub fn new(
        relay_config: RelayConfig,
        telemetry: Arc<dyn TelemetrySource>,
        uplink: Arc<dyn UplinkSink>,
    ) -> Self {
        Self {
            onboard: Arc::new(RwLock::new(OnboardState::new())),
            telemetry,
            uplink,
            relay_config,
            started_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Create server state backed by the simulated transceiver.
    pub fn with_simulated_device(relay_config: RelayConfig) -> Self {
        let device = Arc::new(SimulatedTransceiver::start(TransceiverConfig::default()));
        Self::new(relay_config, device.clone(), device)
    }
}
