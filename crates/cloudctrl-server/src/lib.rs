//! HTTP surface for the CloudCtrl weather service.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::{router, WeatherResponse};
pub use state::AppState;

use anyhow::{Context, Result};
use cloudctrl_core::Config;

/// Bind the configured address and serve until Ctrl-C.
pub async fn serve(config: &Config) -> Result<()> {
    let app = router(AppState::from_config(config));

    let listener = tokio::net::TcpListener::bind(&config.server.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.server.bind_addr))?;

    tracing::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown requested");
}
