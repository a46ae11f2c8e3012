//! Web server for the CubeLink relay.

pub mod router;
pub mod types;

pub use router::create_router_with_state;
pub use types::ServerState;

use std::net::SocketAddr;

/// Run the web server with graceful shutdown.
pub async fn run(bind: SocketAddr, state: ServerState) -> anyhow::Result<()> {
    let app = create_router_with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!(category = "server", %bind, "relay listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(crate::shutdown::shutdown_signal())
        .await?;

    tracing::info!(category = "server", "server shutdown complete");
    Ok(())
}
