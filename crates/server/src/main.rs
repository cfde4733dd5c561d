//! mixfeed server entry point.
//!
//! Loads configuration, primes the content cache, and serves the mixed feed
//! over HTTP until interrupted. The cache is stopped only after the server
//! has drained.

use anyhow::Result;
use mixfeed_core::AppConfig;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod app;
mod error;
mod handler;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = AppConfig::load()?;
    let addr = config.socket_addr()?;

    tracing::info!(%addr, "initialising mixfeed server");

    let app = app::App::bootstrap(&config)?;

    // The first reader must not see an empty cache.
    app.cache.start().await?;

    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");

    let served = axum::serve(listener, handler::router(app.service.clone()))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    app.cache.stop().await;
    served?;

    tracing::info!("mixfeed server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
