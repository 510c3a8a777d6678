//! # schemagate-api: Binary Entry Point
//!
//! Starts the Axum HTTP server. Uses Postgres when `DATABASE_URL` is set
//! and an in-memory store otherwise.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use schemagate_api::config::{AppConfig, LogFormat};
use schemagate_api::middleware::metrics::install_recorder;
use schemagate_api::state::AppState;
use schemagate_store::{MemoryStore, PgStore, ResourceStore};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("invalid configuration")?;
    init_tracing(config.log_format);
    tracing::debug!(?config, "configuration loaded");

    let store: Arc<dyn ResourceStore> = match &config.database_url {
        Some(url) => {
            let store = PgStore::connect(url, &config.pool_config())
                .await
                .context("database initialization failed")?;
            Arc::new(store)
        }
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory store, data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let mut state = AppState::with_store(store, config.clone());
    if config.metrics_enabled {
        let handle = install_recorder().context("failed to install Prometheus recorder")?;
        state = state.with_metrics(handle);
    }
    if config.strict_registration {
        tracing::info!("strict registration enabled: non-strict schemas are rejected at registration");
    }

    let app = schemagate_api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("SchemaGate API listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("SchemaGate API stopped");
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
