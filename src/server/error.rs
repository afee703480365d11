//! API error handling.

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use crate::chart::ChartError;
use crate::geocode::GeocodeError;
use crate::report::ReportError;

/// API error
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed query parameters
    #[error("{0}")]
    InvalidQuery(String),

    /// Parameters parse but describe an impossible date, time or zone
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// Geocoder failed or rejected the request
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Unavailable(String),

    #[error("{0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub status: u16,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidQuery(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "request failed");
        }

        let body = ErrorResponse {
            error: self.to_string(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::InvalidQuery(rejection.body_text())
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::InvalidDate(_) | ChartError::InvalidTimezone(_) => {
                ApiError::BadRequest(err.to_string())
            }
            ChartError::Ephemeris(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        match err {
            GeocodeError::NotConfigured => ApiError::Unavailable(err.to_string()),
            GeocodeError::Request(_) | GeocodeError::Upstream { .. } => {
                ApiError::Upstream(err.to_string())
            }
            GeocodeError::Cache(_) | GeocodeError::CacheTask(_) => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}

impl From<ReportError> for ApiError {
    fn from(err: ReportError) -> Self {
        ApiError::Internal(err.to_string())
    }
}
