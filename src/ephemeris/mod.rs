//! Swiss Ephemeris access: Julian Days, graha longitudes and house cusps.

pub mod calculator;
pub mod houses;

pub use calculator::*;
pub use houses::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("Swiss Ephemeris error for {body}: {message}")]
    Calculation { body: &'static str, message: String },

    #[error("Failed to calculate houses (system '{system}') at latitude {latitude}")]
    Houses { system: char, latitude: f64 },
}
