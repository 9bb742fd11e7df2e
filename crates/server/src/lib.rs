//! HTTP layer for the telco ML service.
//!
//! Loads both models once, then serves:
//! - `POST /recommend`: plan recommendation for one customer
//! - `POST /recommend/batch`: recommendations for an array of customers
//! - `POST /predict`: churn risk for one customer
//! - `GET /health`: which models are loaded

pub mod config;
pub mod responses;
pub mod routes;
pub mod state;

pub use config::{ServerConfig, DEFAULT_ADDR};
pub use routes::router;
pub use state::AppState;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

/// Load artifacts and serve until Ctrl-C.
pub async fn serve(config: ServerConfig) -> Result<()> {
    info!("Loading models from {}", config.model_dir.display());
    let state = tokio::task::spawn_blocking({
        let config = config.clone();
        move || AppState::load(&config)
    })
    .await
    .context("Model loading task panicked")??;

    let listener = TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.addr))?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
