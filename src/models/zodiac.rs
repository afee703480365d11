use serde::Serialize;
use std::fmt;

/// Zodiac signs (rashis) in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Rashi {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl Rashi {
    /// Get sign from ecliptic longitude (0-360 degrees)
    pub fn from_longitude(longitude: f64) -> Self {
        let normalized = longitude.rem_euclid(360.0);
        let sign_index = (normalized / 30.0).floor() as usize;
        Self::from_index(sign_index)
    }

    /// Get sign from index (0 = Aries, 11 = Pisces)
    pub fn from_index(index: usize) -> Self {
        match index % 12 {
            0 => Rashi::Aries,
            1 => Rashi::Taurus,
            2 => Rashi::Gemini,
            3 => Rashi::Cancer,
            4 => Rashi::Leo,
            5 => Rashi::Virgo,
            6 => Rashi::Libra,
            7 => Rashi::Scorpio,
            8 => Rashi::Sagittarius,
            9 => Rashi::Capricorn,
            10 => Rashi::Aquarius,
            11 => Rashi::Pisces,
            _ => unreachable!(),
        }
    }

    /// Ruling graha of the sign
    pub fn lord(&self) -> Graha {
        match self {
            Rashi::Aries | Rashi::Scorpio => Graha::Mars,
            Rashi::Taurus | Rashi::Libra => Graha::Venus,
            Rashi::Gemini | Rashi::Virgo => Graha::Mercury,
            Rashi::Cancer => Graha::Moon,
            Rashi::Leo => Graha::Sun,
            Rashi::Sagittarius | Rashi::Pisces => Graha::Jupiter,
            Rashi::Capricorn | Rashi::Aquarius => Graha::Saturn,
        }
    }
}

impl fmt::Display for Rashi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The nine grahas of a kundli
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Graha {
    Sun,
    Moon,
    Mars,
    Mercury,
    Jupiter,
    Venus,
    Saturn,
    /// Mean ascending lunar node
    Rahu,
    /// Point opposite Rahu
    Ketu,
}

impl Graha {
    /// All grahas, in chart output order
    pub fn all() -> &'static [Graha] {
        &[
            Graha::Sun,
            Graha::Moon,
            Graha::Mars,
            Graha::Mercury,
            Graha::Jupiter,
            Graha::Venus,
            Graha::Saturn,
            Graha::Rahu,
            Graha::Ketu,
        ]
    }

    /// Swiss Ephemeris body ID used to compute this graha.
    /// Ketu shares Rahu's body and is shifted by 180 degrees afterwards.
    pub fn swe_id(&self) -> i32 {
        match self {
            Graha::Sun => 0,            // SE_SUN
            Graha::Moon => 1,           // SE_MOON
            Graha::Mercury => 2,        // SE_MERCURY
            Graha::Venus => 3,          // SE_VENUS
            Graha::Mars => 4,           // SE_MARS
            Graha::Jupiter => 5,        // SE_JUPITER
            Graha::Saturn => 6,         // SE_SATURN
            Graha::Rahu | Graha::Ketu => 10, // SE_MEAN_NODE
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Graha::Sun => "Sun",
            Graha::Moon => "Moon",
            Graha::Mars => "Mars",
            Graha::Mercury => "Mercury",
            Graha::Jupiter => "Jupiter",
            Graha::Venus => "Venus",
            Graha::Saturn => "Saturn",
            Graha::Rahu => "Rahu",
            Graha::Ketu => "Ketu",
        }
    }
}

impl fmt::Display for Graha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Round half away from zero to two decimals
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rashi_from_longitude() {
        assert_eq!(Rashi::from_longitude(0.0), Rashi::Aries);
        assert_eq!(Rashi::from_longitude(29.999), Rashi::Aries);
        assert_eq!(Rashi::from_longitude(45.0), Rashi::Taurus);
        assert_eq!(Rashi::from_longitude(280.0), Rashi::Capricorn);
        assert_eq!(Rashi::from_longitude(359.9), Rashi::Pisces);
    }

    #[test]
    fn rashi_wraps_out_of_range_longitudes() {
        assert_eq!(Rashi::from_longitude(360.0), Rashi::Aries);
        assert_eq!(Rashi::from_longitude(395.0), Rashi::Taurus);
        assert_eq!(Rashi::from_longitude(-10.0), Rashi::Pisces);
    }

    #[test]
    fn rashi_lords() {
        let lords: Vec<Graha> = (0..12).map(|i| Rashi::from_index(i).lord()).collect();
        assert_eq!(
            lords,
            vec![
                Graha::Mars,
                Graha::Venus,
                Graha::Mercury,
                Graha::Moon,
                Graha::Sun,
                Graha::Mercury,
                Graha::Venus,
                Graha::Mars,
                Graha::Jupiter,
                Graha::Saturn,
                Graha::Saturn,
                Graha::Jupiter,
            ]
        );
    }

    #[test]
    fn graha_serializes_as_plain_name() {
        assert_eq!(serde_json::to_string(&Graha::Rahu).unwrap(), "\"Rahu\"");
        assert_eq!(serde_json::to_string(&Rashi::Sagittarius).unwrap(), "\"Sagittarius\"");
    }

    #[test]
    fn rounding() {
        assert_eq!(round2(123.456), 123.46);
        assert_eq!(round2(0.004), 0.0);
        assert_eq!(round2(-1.005_1), -1.01);
    }
}
