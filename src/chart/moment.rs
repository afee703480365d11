//! Birth date/time resolution: local wall clock to UT and Julian Day.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Utc};
use chrono_tz::Tz;

use super::ChartError;
use crate::ephemeris::datetime_to_julian_day;

/// Supported birth years
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 1..=9999;

/// How the local birth time relates to UT
#[derive(Debug, Clone, PartialEq)]
pub enum UtcOffset {
    /// Fixed offset in hours east of Greenwich (e.g. 5.5 for IST)
    Hours(f64),
    /// IANA zone name (e.g. "Asia/Kolkata"), resolved for the birth date
    Zone(String),
}

impl std::fmt::Display for UtcOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // Debug keeps the fraction on whole hours ("5.0", not "5")
            UtcOffset::Hours(hours) => write!(f, "{:?}", hours),
            UtcOffset::Zone(name) => f.write_str(name),
        }
    }
}

/// A resolved birth instant
#[derive(Debug, Clone)]
pub struct BirthMoment {
    /// Wall-clock time at the birth place
    pub local: NaiveDateTime,
    /// Same instant in UT
    pub utc: NaiveDateTime,
    pub julian_day: f64,
    pub offset: UtcOffset,
}

impl BirthMoment {
    pub fn new(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        offset: UtcOffset,
    ) -> Result<Self, ChartError> {
        if !YEAR_RANGE.contains(&year) {
            return Err(ChartError::InvalidDate(format!(
                "year {} is outside {}..={}",
                year,
                YEAR_RANGE.start(),
                YEAR_RANGE.end()
            )));
        }
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            ChartError::InvalidDate(format!("{}-{:02}-{:02} is not a calendar date", year, month, day))
        })?;
        let time = NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(|| {
            ChartError::InvalidDate(format!("{:02}:{:02} is not a valid time of day", hour, minute))
        })?;
        let local = NaiveDateTime::new(date, time);

        let utc = match &offset {
            UtcOffset::Hours(hours) => {
                if !hours.is_finite() {
                    return Err(ChartError::InvalidTimezone(format!("offset {} is not a number", hours)));
                }
                let millis = (hours * 3_600_000.0).round() as i64;
                TimeDelta::try_milliseconds(millis)
                    .and_then(|shift| local.checked_sub_signed(shift))
                    .ok_or_else(|| {
                        ChartError::InvalidDate(format!("{} shifted by {} hours overflows", local, hours))
                    })?
            }
            UtcOffset::Zone(name) => {
                let tz: Tz = name
                    .parse()
                    .map_err(|_| ChartError::InvalidTimezone(format!("unknown zone '{}'", name)))?;
                tz.from_local_datetime(&local)
                    .single()
                    .ok_or_else(|| {
                        ChartError::InvalidDate(format!(
                            "{} is ambiguous or skipped in {}",
                            local, name
                        ))
                    })?
                    .with_timezone(&Utc)
                    .naive_utc()
            }
        };

        Ok(Self {
            local,
            utc,
            julian_day: datetime_to_julian_day(utc),
            offset,
        })
    }

    /// Local time as `Y-MM-DD HH:MM`, year unpadded
    pub fn local_label(&self) -> String {
        use chrono::{Datelike, Timelike};
        format!(
            "{}-{:02}-{:02} {:02}:{:02}",
            self.local.year(),
            self.local.month(),
            self.local.day(),
            self.local.hour(),
            self.local.minute()
        )
    }

    pub fn utc_label(&self) -> String {
        self.utc.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_offset_is_subtracted() {
        let moment = BirthMoment::new(1990, 5, 17, 10, 30, UtcOffset::Hours(5.5)).unwrap();
        assert_eq!(moment.utc_label(), "1990-05-17 05:00:00");
        assert_eq!(moment.local_label(), "1990-05-17 10:30");
    }

    #[test]
    fn negative_offset_crosses_midnight() {
        let moment = BirthMoment::new(2001, 12, 31, 22, 15, UtcOffset::Hours(-5.0)).unwrap();
        assert_eq!(moment.utc_label(), "2002-01-01 03:15:00");
    }

    #[test]
    fn julian_day_tracks_utc() {
        let moment = BirthMoment::new(2000, 1, 1, 17, 30, UtcOffset::Hours(5.5)).unwrap();
        assert!((moment.julian_day - 2451545.0).abs() < 1e-9);
    }

    #[test]
    fn named_zone_resolves_dst() {
        let moment = BirthMoment::new(
            2020,
            7,
            1,
            12,
            0,
            UtcOffset::Zone("America/New_York".to_string()),
        )
        .unwrap();
        assert_eq!(moment.utc_label(), "2020-07-01 16:00:00");
    }

    #[test]
    fn skipped_local_time_is_rejected() {
        let err = BirthMoment::new(
            2021,
            3,
            14,
            2,
            30,
            UtcOffset::Zone("America/New_York".to_string()),
        )
        .unwrap_err();
        assert!(matches!(err, ChartError::InvalidDate(_)));
    }

    #[test]
    fn invalid_calendar_values() {
        assert!(matches!(
            BirthMoment::new(2020, 13, 1, 0, 0, UtcOffset::Hours(0.0)),
            Err(ChartError::InvalidDate(_))
        ));
        assert!(matches!(
            BirthMoment::new(2019, 2, 29, 0, 0, UtcOffset::Hours(0.0)),
            Err(ChartError::InvalidDate(_))
        ));
        assert!(matches!(
            BirthMoment::new(2020, 1, 1, 24, 0, UtcOffset::Hours(0.0)),
            Err(ChartError::InvalidDate(_))
        ));
    }

    #[test]
    fn bad_timezones() {
        assert!(matches!(
            BirthMoment::new(2020, 1, 1, 0, 0, UtcOffset::Zone("Mars/Olympus".into())),
            Err(ChartError::InvalidTimezone(_))
        ));
        assert!(matches!(
            BirthMoment::new(2020, 1, 1, 0, 0, UtcOffset::Hours(f64::NAN)),
            Err(ChartError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn years_outside_four_digits_are_rejected() {
        for year in [0, -44, 10_000, 262_142] {
            assert!(
                matches!(
                    BirthMoment::new(year, 12, 31, 23, 0, UtcOffset::Hours(-14.0)),
                    Err(ChartError::InvalidDate(_))
                ),
                "year {year}"
            );
        }
        assert!(BirthMoment::new(9999, 12, 31, 23, 0, UtcOffset::Hours(-14.0)).is_ok());
    }

    #[test]
    fn huge_offsets_error_instead_of_overflowing() {
        let moment = BirthMoment::new(2000, 1, 1, 0, 0, UtcOffset::Hours(26.0)).unwrap();
        assert_eq!(moment.utc_label(), "1999-12-30 22:00:00");

        for hours in [1e12, -1e30] {
            assert!(matches!(
                BirthMoment::new(2000, 1, 1, 0, 0, UtcOffset::Hours(hours)),
                Err(ChartError::InvalidDate(_))
            ));
        }
    }

    #[test]
    fn whole_hour_offsets_keep_a_decimal() {
        assert_eq!(UtcOffset::Hours(5.0).to_string(), "5.0");
        assert_eq!(UtcOffset::Hours(-3.5).to_string(), "-3.5");
    }

    #[test]
    fn small_years_are_not_padded() {
        let moment = BirthMoment::new(850, 3, 4, 5, 6, UtcOffset::Hours(0.0)).unwrap();
        assert_eq!(moment.local_label(), "850-03-04 05:06");
    }
}
