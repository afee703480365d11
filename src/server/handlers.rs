//! Route handlers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::error::ApiError;
use super::AppState;
use crate::chart::{self, BirthMoment, UtcOffset};
use crate::models::{KpKundli, Kundli, Location, VimshottariDasha};
use crate::report;

const CITY_NOT_FOUND: &str = "City not found.";
const LOCATION_NOT_FOUND: &str = "Invalid city or location not found.";

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub message: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CityQuery {
    pub city: String,
}

/// Birth details shared by every chart endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct BirthQuery {
    pub y: i32,
    pub m: u32,
    pub d: u32,
    pub hr: u32,
    pub mn: u32,
    pub city: String,
    /// Hours east of UTC
    pub tz: Option<f64>,
    /// IANA zone name; takes precedence over `tz`
    pub zone: Option<String>,
}

impl BirthQuery {
    fn offset(&self) -> Result<UtcOffset, ApiError> {
        match (&self.zone, self.tz) {
            (Some(zone), _) if !zone.trim().is_empty() => {
                Ok(UtcOffset::Zone(zone.trim().to_string()))
            }
            (_, Some(hours)) => Ok(UtcOffset::Hours(hours)),
            _ => Err(ApiError::InvalidQuery(
                "Failed to deserialize query string: missing field `tz`".to_string(),
            )),
        }
    }

    fn moment(&self) -> Result<BirthMoment, ApiError> {
        let moment = BirthMoment::new(self.y, self.m, self.d, self.hr, self.mn, self.offset()?)?;
        Ok(moment)
    }
}

async fn locate(state: &AppState, city: &str, not_found: &str) -> Result<Location, ApiError> {
    state
        .geocoder
        .locate(city)
        .await?
        .ok_or_else(|| ApiError::NotFound(not_found.to_string()))
}

/// Validate birth data, then geocode the city
async fn resolve(state: &AppState, query: &BirthQuery) -> Result<(BirthMoment, Location), ApiError> {
    // Julian Day conversion goes through the ephemeris lock
    let birth = query.clone();
    let moment = tokio::task::spawn_blocking(move || birth.moment())
        .await
        .map_err(|e| ApiError::Internal(format!("birth time resolution aborted: {e}")))??;
    let location = locate(state, &query.city, LOCATION_NOT_FOUND).await?;
    Ok((moment, location))
}

/// Run ephemeris work off the async executor
async fn compute<T, F>(work: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, chart::ChartError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::Internal(format!("chart computation aborted: {e}")))?
        .map_err(ApiError::from)
}

/// GET /
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse {
        message: "🔮 Kundli Engine API is Running Successfully!",
    })
}

/// GET /city?city=
pub async fn city_lookup(
    State(state): State<AppState>,
    query: Result<Query<CityQuery>, QueryRejection>,
) -> Result<Json<Location>, ApiError> {
    let Query(params) = query?;
    let location = locate(&state, &params.city, CITY_NOT_FOUND).await?;
    Ok(Json(location))
}

/// GET /kundli?y=&m=&d=&hr=&mn=&city=&tz=
pub async fn kundli(
    State(state): State<AppState>,
    query: Result<Query<BirthQuery>, QueryRejection>,
) -> Result<Json<Kundli>, ApiError> {
    let Query(params) = query?;
    let (moment, location) = resolve(&state, &params).await?;
    let chart = compute(move || chart::kundli(&moment, location.latitude, location.longitude)).await?;
    Ok(Json(chart))
}

/// GET /dasha?y=&m=&d=&hr=&mn=&city=&tz=
pub async fn dasha(
    State(state): State<AppState>,
    query: Result<Query<BirthQuery>, QueryRejection>,
) -> Result<Json<VimshottariDasha>, ApiError> {
    let Query(params) = query?;
    let (moment, _location) = resolve(&state, &params).await?;
    let dasha = compute(move || chart::vimshottari(&moment)).await?;
    Ok(Json(dasha))
}

/// GET /kp_kundli?y=&m=&d=&hr=&mn=&city=&tz=
pub async fn kp_kundli(
    State(state): State<AppState>,
    query: Result<Query<BirthQuery>, QueryRejection>,
) -> Result<Json<KpKundli>, ApiError> {
    let Query(params) = query?;
    let (moment, location) = resolve(&state, &params).await?;
    let chart =
        compute(move || chart::kp_kundli(&moment, location.latitude, location.longitude)).await?;
    Ok(Json(chart))
}

/// GET /pdf_kundli?y=&m=&d=&hr=&mn=&city=&tz=
///
/// Returns the report as an attachment; nothing is written to disk.
pub async fn pdf_kundli(
    State(state): State<AppState>,
    query: Result<Query<BirthQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = query?;
    let (moment, location) = resolve(&state, &params).await?;

    let filename = report::report_filename(&params.city);
    let bytes = tokio::task::spawn_blocking(move || -> Result<Vec<u8>, ApiError> {
        let chart = chart::kundli(&moment, location.latitude, location.longitude)?;
        Ok(report::render_pdf(&location, &moment.offset, &chart)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("report rendering aborted: {e}")))??;

    info!(city = %params.city, size = bytes.len(), "rendered kundli report");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
