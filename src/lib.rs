//! Kundli Engine - Vedic astrology HTTP API
//!
//! Natal charts (kundli), KP sign/star/sub lords, Vimshottari dasha and PDF
//! reports computed with the Swiss Ephemeris library.

pub mod chart;
pub mod config;
pub mod ephemeris;
pub mod geocode;
pub mod models;
pub mod report;
pub mod server;
pub mod storage;

pub use config::ServerConfig;
pub use server::AppState;
