use serde::{Deserialize, Serialize};

/// Geocoded place
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// City name as requested
    #[serde(rename = "City")]
    pub city: String,
    /// Full place name reported by the geocoder
    #[serde(rename = "Formatted_Location")]
    pub formatted: String,
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}
