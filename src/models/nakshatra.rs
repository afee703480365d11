//! Nakshatra lordship used by KP charts and the Vimshottari dasha.

use super::Graha;

/// Span used to bucket longitudes into nakshatras.
/// Kept at four decimals so existing charts stay reproducible.
pub const NAKSHATRA_SPAN: f64 = 13.3333;

/// Vimshottari lord cycle, starting from Ashwini
pub const NAKSHATRA_LORDS: [Graha; 9] = [
    Graha::Ketu,
    Graha::Venus,
    Graha::Sun,
    Graha::Moon,
    Graha::Mars,
    Graha::Rahu,
    Graha::Jupiter,
    Graha::Saturn,
    Graha::Mercury,
];

/// Nakshatra number (0-based, not wrapped to the lord cycle) for a longitude
pub fn nakshatra_index(longitude: f64) -> usize {
    (longitude.rem_euclid(360.0) / NAKSHATRA_SPAN).floor() as usize
}

/// Lord of the nakshatra containing `longitude`
pub fn nakshatra_lord(longitude: f64) -> Graha {
    NAKSHATRA_LORDS[nakshatra_index(longitude) % 9]
}

/// KP star lord and sub lord for a longitude.
///
/// The sub lord is the fourth lord in the cycle counted from the star lord.
pub fn kp_lords(longitude: f64) -> (Graha, Graha) {
    let index = nakshatra_index(longitude) % 9;
    (NAKSHATRA_LORDS[index], NAKSHATRA_LORDS[(index + 3) % 9])
}

/// Vimshottari mahadasha length in years
pub fn dasha_years(lord: Graha) -> u32 {
    match lord {
        Graha::Ketu => 7,
        Graha::Venus => 20,
        Graha::Sun => 6,
        Graha::Moon => 10,
        Graha::Mars => 7,
        Graha::Rahu => 18,
        Graha::Jupiter => 16,
        Graha::Saturn => 19,
        Graha::Mercury => 17,
    }
}

/// The lord cycle rotated so that it begins with `first`
pub fn dasha_sequence(first: Graha) -> Vec<Graha> {
    let start = NAKSHATRA_LORDS
        .iter()
        .position(|lord| *lord == first)
        .unwrap_or(0);
    NAKSHATRA_LORDS[start..]
        .iter()
        .chain(NAKSHATRA_LORDS[..start].iter())
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kp_lords_at_zodiac_start() {
        assert_eq!(kp_lords(0.0), (Graha::Ketu, Graha::Moon));
        assert_eq!(kp_lords(13.0), (Graha::Ketu, Graha::Moon));
    }

    #[test]
    fn kp_lords_cross_nakshatra_boundary() {
        // 13.3333 is the first boundary, not 40/3
        assert_eq!(kp_lords(13.33329), (Graha::Ketu, Graha::Moon));
        assert_eq!(kp_lords(13.3333), (Graha::Venus, Graha::Mars));
        assert_eq!(kp_lords(30.0), (Graha::Sun, Graha::Rahu));
    }

    #[test]
    fn kp_lords_wrap_through_cycle() {
        // Nakshatra 9 (Magha) starts the cycle again with Ketu
        assert_eq!(kp_lords(121.0), (Graha::Ketu, Graha::Moon));
        // Revati is ruled by Mercury; the sub lord wraps round to Sun
        assert_eq!(kp_lords(355.0), (Graha::Mercury, Graha::Sun));
    }

    #[test]
    fn nakshatra_index_never_exceeds_cycle_after_modulo() {
        // 359.9995 / 13.3333 rounds down to 27
        assert_eq!(nakshatra_index(359.9995), 27);
        assert_eq!(nakshatra_lord(359.9995), Graha::Ketu);
    }

    #[test]
    fn dasha_cycle_totals_120_years() {
        let total: u32 = NAKSHATRA_LORDS.iter().map(|g| dasha_years(*g)).sum();
        assert_eq!(total, 120);
    }

    #[test]
    fn dasha_sequence_rotates() {
        let seq = dasha_sequence(Graha::Rahu);
        assert_eq!(seq.len(), 9);
        assert_eq!(seq[0], Graha::Rahu);
        assert_eq!(seq[1], Graha::Jupiter);
        assert_eq!(seq[3], Graha::Mercury);
        assert_eq!(seq[4], Graha::Ketu);
        assert_eq!(seq[8], Graha::Mars);
    }
}
