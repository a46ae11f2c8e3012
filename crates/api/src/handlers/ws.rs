//! WebSocket relay endpoint.

use axum::{
    extract::{State, WebSocketUpgrade},
    response::Response,
};

use cubelink_core::OnboardState;

use crate::relay::{run_session, SessionContext};
use crate::server::ServerState;

/// Upgrade a ground connection into a relay session.
///
/// Each accepted session starts from a clean slate: the mode register is
/// reset to IDLE and a fresh empty command queue is created. Nothing
/// survives a disconnect.
pub async fn ws_relay_handler(State(state): State<ServerState>, ws: WebSocketUpgrade) -> Response {
    ws.on_upgrade(move |socket| async move {
        tracing::info!(category = "relay", "ground connected");

        *state.onboard.write().await = OnboardState::new();
        let ctx = SessionContext::new(
            state.onboard.clone(),
            state.telemetry.clone(),
            state.uplink.clone(),
            state.relay_config.clone(),
        );

        run_session(socket, ctx).await;
    })
}
