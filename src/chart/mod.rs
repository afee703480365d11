//! Kundli, KP and Vimshottari computations on top of the ephemeris.
//!
//! All positions are tropical; houses are Placidus.

pub mod moment;

pub use moment::{BirthMoment, UtcOffset};

use chrono::TimeDelta;
use thiserror::Error;

use crate::ephemeris::{
    calc_all_grahas, calc_graha_position, calc_houses, EphemerisError, GrahaPosition,
    HousePositions, HOUSE_PLACIDUS,
};
use crate::models::{
    dasha_sequence, dasha_years, kp_lords, nakshatra_lord, round2, DashaPeriod, Graha,
    GrahaTable, HousePlacement, HouseTable, KpHouse, KpKundli, KpPlanet, Kundli,
    PlanetPlacement, Rashi, VimshottariDasha,
};

/// Hours in a Vimshottari year of 365.25 days
const HOURS_PER_DASHA_YEAR: i64 = 8766;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("Invalid date/time: {0}")]
    InvalidDate(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),
}

fn placements(
    moment: &BirthMoment,
    latitude: f64,
    longitude: f64,
) -> Result<(Vec<(Graha, GrahaPosition)>, HousePositions), ChartError> {
    let grahas = calc_all_grahas(moment.julian_day)?;
    let houses = calc_houses(moment.julian_day, latitude, longitude, HOUSE_PLACIDUS)?;
    Ok((grahas, houses))
}

/// Natal chart: graha longitudes with sign lords, Placidus cusps and ascendant
pub fn kundli(moment: &BirthMoment, latitude: f64, longitude: f64) -> Result<Kundli, ChartError> {
    let (grahas, houses) = placements(moment, latitude, longitude)?;

    let planets = grahas
        .into_iter()
        .map(|(graha, position)| {
            let rashi = Rashi::from_longitude(position.longitude);
            let placement = PlanetPlacement {
                longitude: round2(position.longitude),
                rashi,
                lord: rashi.lord(),
            };
            (graha, placement)
        })
        .collect();

    let cusps = houses
        .cusps
        .iter()
        .map(|&cusp| {
            let rashi = Rashi::from_longitude(cusp);
            HousePlacement {
                degree: round2(cusp),
                rashi,
                lord: rashi.lord(),
            }
        })
        .collect();

    Ok(Kundli {
        local_time: moment.local_label(),
        utc_time: moment.utc_label(),
        julian_day: moment.julian_day,
        ascendant: round2(houses.ascendant),
        planets: GrahaTable(planets),
        houses: HouseTable(cusps),
    })
}

/// KP chart: sign, star and sub lords for every graha and cusp
pub fn kp_kundli(
    moment: &BirthMoment,
    latitude: f64,
    longitude: f64,
) -> Result<KpKundli, ChartError> {
    let (grahas, houses) = placements(moment, latitude, longitude)?;

    let planets = grahas
        .into_iter()
        .map(|(graha, position)| {
            let rashi = Rashi::from_longitude(position.longitude);
            let (star_lord, sub_lord) = kp_lords(position.longitude);
            let entry = KpPlanet {
                longitude: round2(position.longitude),
                rashi,
                sign_lord: rashi.lord(),
                star_lord,
                sub_lord,
            };
            (graha, entry)
        })
        .collect();

    let cusps = houses
        .cusps
        .iter()
        .map(|&cusp| {
            let rashi = Rashi::from_longitude(cusp);
            let (star_lord, sub_lord) = kp_lords(cusp);
            KpHouse {
                degree: round2(cusp),
                rashi,
                sign_lord: rashi.lord(),
                star_lord,
                sub_lord,
            }
        })
        .collect();

    Ok(KpKundli {
        local_time: moment.local_label(),
        planets: GrahaTable(planets),
        houses: HouseTable(cusps),
    })
}

/// Vimshottari mahadashas from the Moon's birth nakshatra.
///
/// Periods are chained from the local birth time, each lasting
/// `years * 365.25` days.
pub fn vimshottari(moment: &BirthMoment) -> Result<VimshottariDasha, ChartError> {
    let moon = calc_graha_position(Graha::Moon, moment.julian_day)?;
    let first_lord = nakshatra_lord(moon.longitude);

    let mut start = moment.local;
    let periods = dasha_sequence(first_lord)
        .into_iter()
        .map(|lord| {
            let years = dasha_years(lord);
            let end = TimeDelta::try_hours(years as i64 * HOURS_PER_DASHA_YEAR)
                .and_then(|span| start.checked_add_signed(span))
                .ok_or_else(|| {
                    ChartError::InvalidDate(format!("{} dasha from {} runs past the calendar", lord, start))
                })?;
            let period = DashaPeriod {
                planet: lord,
                start_date: start.date(),
                end_date: end.date(),
                years,
            };
            start = end;
            Ok(period)
        })
        .collect::<Result<Vec<_>, ChartError>>()?;

    Ok(VimshottariDasha {
        birth_moon_longitude: round2(moon.longitude),
        nakshatra_lord: first_lord,
        periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NAKSHATRA_LORDS;
    use chrono::{Datelike, NaiveDate};

    fn delhi_moment() -> BirthMoment {
        BirthMoment::new(1990, 5, 17, 10, 30, UtcOffset::Hours(5.5)).unwrap()
    }

    #[test]
    fn kundli_has_nine_grahas_and_twelve_houses() {
        let chart = kundli(&delhi_moment(), 28.61, 77.21).unwrap();

        let order: Vec<Graha> = chart.planets.iter().map(|(g, _)| *g).collect();
        assert_eq!(order, Graha::all().to_vec());
        assert_eq!(chart.houses.len(), 12);
        assert_eq!(chart.local_time, "1990-05-17 10:30");
        assert_eq!(chart.utc_time, "1990-05-17 05:00:00");
    }

    #[test]
    fn kundli_lords_follow_rashi() {
        let chart = kundli(&delhi_moment(), 28.61, 77.21).unwrap();
        for (_, placement) in chart.planets.iter() {
            assert_eq!(placement.lord, placement.rashi.lord());
            assert!((0.0..=360.0).contains(&placement.longitude));
        }
        // Sun in mid-May is in tropical Taurus
        assert_eq!(chart.planets.get(Graha::Sun).unwrap().rashi, Rashi::Taurus);
    }

    #[test]
    fn ketu_is_opposite_rahu_after_rounding() {
        let chart = kundli(&delhi_moment(), 28.61, 77.21).unwrap();
        let rahu = chart.planets.get(Graha::Rahu).unwrap().longitude;
        let ketu = chart.planets.get(Graha::Ketu).unwrap().longitude;
        let diff = (ketu - rahu).rem_euclid(360.0);
        assert!((diff - 180.0).abs() <= 0.011);
    }

    #[test]
    fn ascendant_matches_first_house() {
        let chart = kundli(&delhi_moment(), 28.61, 77.21).unwrap();
        let house_one = &chart.houses.0[0];
        assert_eq!(chart.ascendant, house_one.degree);
    }

    #[test]
    fn kp_lords_are_consistent_with_longitudes() {
        let chart = kp_kundli(&delhi_moment(), 28.61, 77.21).unwrap();
        assert_eq!(chart.houses.len(), 12);
        for (_, planet) in chart.planets.iter() {
            assert_eq!(planet.sign_lord, planet.rashi.lord());
            let star_index = NAKSHATRA_LORDS
                .iter()
                .position(|g| *g == planet.star_lord)
                .unwrap();
            assert_eq!(planet.sub_lord, NAKSHATRA_LORDS[(star_index + 3) % 9]);
        }
    }

    #[test]
    fn dasha_periods_are_contiguous_and_span_120_years() {
        let moment = delhi_moment();
        let dasha = vimshottari(&moment).unwrap();

        assert_eq!(dasha.periods.len(), 9);
        assert_eq!(dasha.periods[0].planet, dasha.nakshatra_lord);
        assert_eq!(
            dasha.periods[0].start_date,
            NaiveDate::from_ymd_opt(1990, 5, 17).unwrap()
        );
        for pair in dasha.periods.windows(2) {
            assert_eq!(pair[0].end_date, pair[1].start_date);
        }
        let total: u32 = dasha.periods.iter().map(|p| p.years).sum();
        assert_eq!(total, 120);

        // 120 * 365.25 days after 1990-05-17 10:30
        let last = dasha.periods.last().unwrap();
        assert_eq!(last.end_date, NaiveDate::from_ymd_opt(2110, 5, 18).unwrap());
    }

    #[test]
    fn dasha_past_calendar_end_is_an_error() {
        let mut moment = delhi_moment();
        moment.local = NaiveDate::from_ymd_opt(262_100, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();

        let err = vimshottari(&moment).unwrap_err();
        assert!(matches!(err, ChartError::InvalidDate(_)));
    }

    #[test]
    fn last_supported_year_has_a_full_dasha() {
        let moment = BirthMoment::new(9999, 12, 31, 23, 59, UtcOffset::Hours(-14.0)).unwrap();
        let dasha = vimshottari(&moment).unwrap();
        assert_eq!(dasha.periods.len(), 9);
        assert!(dasha.periods.last().unwrap().end_date.year() > 10_100);
    }

    #[test]
    fn dasha_starts_from_local_not_utc_date() {
        // 01:00 local at +5.5 is the previous day in UT
        let moment = BirthMoment::new(1985, 1, 10, 1, 0, UtcOffset::Hours(5.5)).unwrap();
        let dasha = vimshottari(&moment).unwrap();
        assert_eq!(
            dasha.periods[0].start_date,
            NaiveDate::from_ymd_opt(1985, 1, 10).unwrap()
        );
    }
}
