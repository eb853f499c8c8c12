//! caledit - periodic calendar description editor
//!
//! Loads the configuration, starts the sync loop and serves the control
//! surface until interrupted.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use caledit_api::utils::logging::init_tracing;
use caledit_api::{router, AppContext};

/// Environment variable overriding the control surface address.
const LISTEN_ADDR_ENV: &str = "CALEDIT_LISTEN_ADDR";
const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env before tracing so RUST_LOG from the file applies
    let dotenv = dotenvy::dotenv();

    init_tracing();

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded .env"),
        Err(e) => tracing::debug!(error = %e, "No .env file loaded"),
    }

    let ctx = Arc::new(AppContext::from_environment().context("invalid configuration")?);
    ctx.start().await.context("failed to start sync scheduler")?;

    let addr: SocketAddr = std::env::var(LISTEN_ADDR_ENV)
        .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string())
        .parse()
        .with_context(|| format!("{LISTEN_ADDR_ENV} is not a socket address"))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "caledit listening");

    axum::serve(listener, router(ctx.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("control surface failed")?;

    ctx.shutdown().await;
    tracing::info!("caledit stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
