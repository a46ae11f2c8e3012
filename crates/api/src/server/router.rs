//! Application router configuration.

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;

use super::types::ServerState;
use crate::handlers::{basic, ws};

/// Create the application router with a specific state.
pub fn create_router_with_state(state: ServerState) -> Router {
    Router::new()
        .route("/api/health", get(basic::health_handler))
        .route("/api/health/live", get(basic::liveness_handler))
        .route("/ws", get(ws::ws_relay_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
