//! API handlers organized by domain.

pub mod basic;
pub mod ws;

// Re-export ServerState so handlers can use it
pub use crate::server::ServerState;

pub use basic::{health_handler, liveness_handler};
pub use ws::ws_relay_handler;
