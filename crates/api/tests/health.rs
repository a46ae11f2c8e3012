//! Health endpoint tests via tower's oneshot, no network needed.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use cubelink_api::{create_router_with_state, ServerState};
use cubelink_core::{ModeName, RelayConfig};
use cubelink_devices::SimulatedTransceiver;

fn test_state() -> ServerState {
    let device = Arc::new(SimulatedTransceiver::idle());
    ServerState::new(RelayConfig::default(), device.clone(), device)
}

async fn get_json(state: ServerState, uri: &str) -> (StatusCode, serde_json::Value) {
    let router = create_router_with_state(state);
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn health_returns_ok_and_mode() {
    let (status, body) = get_json(test_state(), "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["mode"], "IDLE");
}

#[tokio::test]
async fn health_reflects_current_mode() {
    let state = test_state();
    state.onboard.write().await.mode = ModeName::Science;
    let (status, body) = get_json(state, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mode"], "SCIENCE");
}

#[tokio::test]
async fn liveness_probe_answers() {
    let (status, body) = get_json(test_state(), "/api/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}
