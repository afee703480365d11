//! Kundli Engine - Entry Point
//!
//! Serves the Kundli API over HTTP on `HOST:PORT` (default `0.0.0.0:8000`).

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use kundli_engine::ephemeris::init_ephemeris;
use kundli_engine::server::{bind, serve, shutdown_signal};
use kundli_engine::{AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = ServerConfig::parse();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Kundli Engine");

    // Initialize Swiss Ephemeris
    init_ephemeris();

    let state = AppState::from_config(&config)?;
    let addr = config
        .socket_addr()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let listener = bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    serve(listener, state, shutdown_signal()).await?;

    tracing::info!("Server shutting down");

    Ok(())
}
