//! HTTP server: routes, shared state and the listen loop.

pub mod error;
pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::geocode::Geocoder;
use crate::storage::LocationCache;

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub geocoder: Arc<Geocoder>,
}

impl AppState {
    pub fn new(geocoder: Geocoder) -> Self {
        Self {
            geocoder: Arc::new(geocoder),
        }
    }

    /// Build state from configuration: geocoder plus optional SQLite cache
    pub fn from_config(config: &ServerConfig) -> anyhow::Result<Self> {
        let mut geocoder = Geocoder::new(
            &config.geocoder_url,
            config.opencage_api_key.clone(),
            config.geocode_timeout(),
        )
        .context("failed to build geocoder client")?;

        if !geocoder.is_configured() {
            warn!("OPENCAGE_API_KEY is not set; city lookups will fail with 503");
        }

        if let Some(path) = config.resolved_cache_path() {
            let cache = LocationCache::open(&path)
                .with_context(|| format!("failed to open geocode cache at {}", path.display()))?;
            info!(path = %path.display(), "geocode cache enabled");
            geocoder = geocoder.with_cache(Arc::new(cache));
        }

        Ok(Self::new(geocoder))
    }
}

/// All routes with CORS open to any origin
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::home))
        .route("/city", get(handlers::city_lookup))
        .route("/kundli", get(handlers::kundli))
        .route("/dasha", get(handlers::dasha))
        .route("/kp_kundli", get(handlers::kp_kundli))
        .route("/pdf_kundli", get(handlers::pdf_kundli))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind the configured address
pub async fn bind(addr: SocketAddr) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(addr).await?;
    info!("Kundli API listening on http://{}", listener.local_addr()?);
    Ok(listener)
}

/// Serve requests on `listener` until `shutdown` resolves
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
