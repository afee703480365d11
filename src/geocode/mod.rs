//! City lookup through the OpenCage geocoding API.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::models::Location;
use crate::storage::{LocationCache, StorageError};

pub const DEFAULT_GEOCODER_URL: &str = "https://api.opencagedata.com";

#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("Geocoder is not configured: no API key")]
    NotConfigured,

    #[error("Geocoder request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Geocoder returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Geocode cache error: {0}")]
    Cache(#[from] StorageError),

    #[error("Geocode cache task failed: {0}")]
    CacheTask(#[from] tokio::task::JoinError),
}

#[derive(Debug, Deserialize)]
struct OpenCageResponse {
    #[serde(default)]
    results: Vec<OpenCageResult>,
}

#[derive(Debug, Deserialize)]
struct OpenCageResult {
    formatted: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    lat: f64,
    lng: f64,
}

/// Resolves city names to coordinates
pub struct Geocoder {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    cache: Option<Arc<LocationCache>>,
}

impl Geocoder {
    pub fn new(
        base_url: &str,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, GeocodeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            cache: None,
        })
    }

    /// Serve repeated lookups from `cache`
    pub fn with_cache(mut self, cache: Arc<LocationCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Find the best match for `city`. `Ok(None)` means the geocoder knows no such place.
    pub async fn locate(&self, city: &str) -> Result<Option<Location>, GeocodeError> {
        if let Some(cache) = &self.cache {
            let cache = Arc::clone(cache);
            let key = city.to_string();
            if let Some(location) = tokio::task::spawn_blocking(move || cache.get(&key)).await?? {
                return Ok(Some(location));
            }
        }

        let api_key = self.api_key.as_deref().ok_or(GeocodeError::NotConfigured)?;
        let url = format!("{}/geocode/v1/json", self.base_url);

        debug!(city, "geocoding");
        let resp = self
            .client
            .get(&url)
            .query(&[("q", city), ("key", api_key)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(city, status = status.as_u16(), "geocoder rejected request");
            return Err(GeocodeError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OpenCageResponse = resp.json().await?;
        let Some(best) = parsed.results.into_iter().next() else {
            info!(city, "no geocoding results");
            return Ok(None);
        };

        let location = Location {
            city: city.to_string(),
            formatted: best.formatted,
            latitude: best.geometry.lat,
            longitude: best.geometry.lng,
        };

        if let Some(cache) = &self.cache {
            let cache = Arc::clone(cache);
            let entry = location.clone();
            match tokio::task::spawn_blocking(move || cache.put(&entry)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!(city, error = %e, "failed to cache location"),
                Err(e) => warn!(city, error = %e, "cache write task failed"),
            }
        }

        Ok(Some(location))
    }
}
