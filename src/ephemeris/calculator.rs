//! Swiss Ephemeris wrapper for graha positions
//!
//! This module provides safe Rust wrappers around the libswisseph-sys FFI bindings.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::os::raw::c_char;
use std::sync::{Mutex, MutexGuard, Once};

use super::EphemerisError;
use crate::models::Graha;

// Swiss Ephemeris constants
const SE_GREG_CAL: i32 = 1;
const SEFLG_SPEED: i32 = 256; // Include speed in calculations
const SEFLG_SWIEPH: i32 = 2; // Use Swiss Ephemeris

static INIT: Once = Once::new();

/// The C library keeps global state; every call into it holds this lock.
static SWE_LOCK: Mutex<()> = Mutex::new(());

pub(super) fn swe_lock() -> MutexGuard<'static, ()> {
    // A panic while holding the lock leaves no Rust state behind, so poisoning is ignored
    SWE_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Initialize Swiss Ephemeris (call once at startup)
pub fn init_ephemeris() {
    INIT.call_once(|| {
        let _guard = swe_lock();
        unsafe {
            // Initialize without ephemeris files (uses Moshier analytical ephemeris)
            // This provides 0.1 arc seconds precision for planets, 3 arc seconds for Moon
            libswisseph_sys::swe_set_ephe_path(std::ptr::null_mut());
        }
    });
}

/// Result of a graha calculation
#[derive(Debug, Clone)]
pub struct GrahaPosition {
    /// Tropical ecliptic longitude (0-360 degrees)
    pub longitude: f64,
    /// Speed in longitude (degrees per day, negative = retrograde)
    pub speed_longitude: f64,
}

/// Convert a date/time to Julian Day (UT)
pub fn datetime_to_julian_day(datetime: NaiveDateTime) -> f64 {
    let year = datetime.date().year();
    let month = datetime.date().month() as i32;
    let day = datetime.date().day() as i32;
    let hour = datetime.time().hour() as f64
        + datetime.time().minute() as f64 / 60.0
        + datetime.time().second() as f64 / 3600.0;

    let _guard = swe_lock();
    unsafe { libswisseph_sys::swe_julday(year, month, day, hour, SE_GREG_CAL) }
}

/// Convert a date to Julian Day (at midnight UT)
pub fn date_to_julian_day(date: NaiveDate) -> f64 {
    datetime_to_julian_day(date.and_time(NaiveTime::MIN))
}

/// Calculate position of a graha at a given Julian Day.
///
/// Ketu is reported opposite the mean node.
pub fn calc_graha_position(graha: Graha, julian_day: f64) -> Result<GrahaPosition, EphemerisError> {
    init_ephemeris();

    let mut xx: [f64; 6] = [0.0; 6];
    let mut serr: [c_char; 256] = [0; 256];

    let iflg = SEFLG_SPEED | SEFLG_SWIEPH;

    let ret = {
        let _guard = swe_lock();
        unsafe {
            libswisseph_sys::swe_calc_ut(
                julian_day,
                graha.swe_id(),
                iflg,
                xx.as_mut_ptr(),
                serr.as_mut_ptr(),
            )
        }
    };

    if ret < 0 {
        let error_msg = unsafe {
            let c_str = std::ffi::CStr::from_ptr(serr.as_ptr());
            c_str.to_string_lossy().to_string()
        };
        return Err(EphemerisError::Calculation {
            body: graha.name(),
            message: error_msg,
        });
    }

    let longitude = match graha {
        Graha::Ketu => (xx[0] + 180.0).rem_euclid(360.0),
        _ => xx[0],
    };

    Ok(GrahaPosition {
        longitude,
        speed_longitude: xx[3],
    })
}

/// Calculate positions for all nine grahas, in chart order
pub fn calc_all_grahas(julian_day: f64) -> Result<Vec<(Graha, GrahaPosition)>, EphemerisError> {
    Graha::all()
        .iter()
        .map(|graha| Ok((*graha, calc_graha_position(*graha, julian_day)?)))
        .collect()
}
