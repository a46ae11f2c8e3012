//! Health check handlers.

use axum::{extract::State, response::Json};
use serde::Serialize;
use serde_json::json;

use cubelink_core::ModeName;

use crate::server::ServerState;

/// Health response carrying the current onboard mode.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub mode: ModeName,
}

/// Synchronous read-only health check: `{ok, mode}`.
pub async fn health_handler(State(state): State<ServerState>) -> Json<HealthResponse> {
    let mode = state.onboard.read().await.mode;
    Json(HealthResponse { ok: true, mode })
}

/// Liveness probe - simple check if server is running.
pub async fn liveness_handler() -> Json<serde_json::Value> {
    Json(json!({
        "status": "alive",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use cubelink_core::RelayConfig;
    use cubelink_devices::SimulatedTransceiver;

    fn test_state() -> ServerState {
        let device = Arc::new(SimulatedTransceiver::idle());
        ServerState::new(RelayConfig::default(), device.clone(), device)
    }

    #[tokio::test]
    async fn health_reports_idle_on_fresh_state() {
        let result = health_handler(State(test_state())).await;
        assert!(result.0.ok);
        assert_eq!(result.0.mode, ModeName::Idle);
    }

    #[tokio::test]
    async fn health_tracks_mode_register() {
        let state = test_state();
        state.onboard.write().await.mode = ModeName::Safe;
        let result = health_handler(State(state)).await;
        assert_eq!(result.0.mode, ModeName::Safe);
    }

    #[tokio::test]
    async fn liveness_is_static() {
        let result = liveness_handler().await;
        assert_eq!(result.0.get("status").unwrap().as_str().unwrap(), "alive");
    }
}
