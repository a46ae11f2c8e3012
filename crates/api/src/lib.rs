//! HTTP/WebSocket server for the CubeLink relay.
//!
//! One WebSocket session per ground connection; three concurrently
//! scheduled loops (command intake, delayed command processing, periodic
//! telemetry) share the onboard mode register and the command queue.

pub mod handlers;
pub mod relay;
pub mod server;
pub mod shutdown;

pub use server::{create_router_with_state, run, ServerState};
