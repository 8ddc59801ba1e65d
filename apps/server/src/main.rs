//! # Tally Server
//!
//! Serves the invoice workflow over HTTP.
//!
//! ```text
//! TALLY_CONFIG / platform config ──► ServerConfig ──► Store ──► axum::serve
//! ```

use tally_server::config::ServerConfig;
use tally_server::{app_router, init_tracing, AppState};
use tally_store::Store;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    info!("Starting Tally server...");

    let config = ServerConfig::load(None)?;
    let store = Store::open(&config.store)?;
    let router = app_router(AppState::new(store));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
