use anyhow::{Context, Result};
use pagedigest::api::{AppState, router};
use pagedigest::core::config::AppConfig;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    pagedigest::setup_logging();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let state = AppState::from_config(&config).context("Failed to initialise services")?;

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_addr))?;
    info!(
        addr = %config.bind_addr,
        backend = config.backend.name(),
        chunk_size = config.chunk_size,
        map_concurrency = config.map_concurrency,
        "pagedigest API listening"
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("pagedigest API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
