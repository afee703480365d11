use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use super::{Graha, Rashi};

/// Per-graha entries serialized as a JSON object keyed by graha name,
/// keeping chart order
#[derive(Debug, Clone)]
pub struct GrahaTable<T>(pub Vec<(Graha, T)>);

impl<T> GrahaTable<T> {
    pub fn get(&self, graha: Graha) -> Option<&T> {
        self.0.iter().find(|(g, _)| *g == graha).map(|(_, entry)| entry)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Graha, T)> {
        self.0.iter()
    }
}

impl<T: Serialize> Serialize for GrahaTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(graha, entry)| (graha.name(), entry)))
    }
}

/// House entries serialized as `House_1` .. `House_12`
#[derive(Debug, Clone)]
pub struct HouseTable<T>(pub Vec<T>);

impl<T> HouseTable<T> {
    pub fn label(index: usize) -> String {
        format!("House_{}", index + 1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (String, &T)> {
        self.0.iter().enumerate().map(|(i, entry)| (Self::label(i), entry))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T: Serialize> Serialize for HouseTable<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

/// Graha placement in a kundli
#[derive(Debug, Clone, Serialize)]
pub struct PlanetPlacement {
    pub longitude: f64,
    pub rashi: Rashi,
    pub lord: Graha,
}

/// House cusp placement in a kundli
#[derive(Debug, Clone, Serialize)]
pub struct HousePlacement {
    pub degree: f64,
    pub rashi: Rashi,
    pub lord: Graha,
}

/// Natal chart with planets and Placidus houses
#[derive(Debug, Clone, Serialize)]
pub struct Kundli {
    #[serde(rename = "Local_Time_IST")]
    pub local_time: String,
    #[serde(rename = "UTC_Time")]
    pub utc_time: String,
    #[serde(rename = "Julian_Day")]
    pub julian_day: f64,
    #[serde(rename = "Ascendant")]
    pub ascendant: f64,
    #[serde(rename = "Planets")]
    pub planets: GrahaTable<PlanetPlacement>,
    #[serde(rename = "Houses")]
    pub houses: HouseTable<HousePlacement>,
}

/// KP placement of a graha
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KpPlanet {
    pub longitude: f64,
    pub rashi: Rashi,
    #[serde(rename = "Sign_Lord")]
    pub sign_lord: Graha,
    #[serde(rename = "Star_Lord")]
    pub star_lord: Graha,
    #[serde(rename = "Sub_Lord")]
    pub sub_lord: Graha,
}

/// KP placement of a house cusp
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct KpHouse {
    pub degree: f64,
    pub rashi: Rashi,
    #[serde(rename = "Sign_Lord")]
    pub sign_lord: Graha,
    #[serde(rename = "Star_Lord")]
    pub star_lord: Graha,
    #[serde(rename = "Sub_Lord")]
    pub sub_lord: Graha,
}

/// Krishnamurti Paddhati chart
#[derive(Debug, Clone, Serialize)]
pub struct KpKundli {
    #[serde(rename = "Local_Time_IST")]
    pub local_time: String,
    #[serde(rename = "KP_Planets")]
    pub planets: GrahaTable<KpPlanet>,
    #[serde(rename = "KP_Houses")]
    pub houses: HouseTable<KpHouse>,
}

/// One Vimshottari mahadasha
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct DashaPeriod {
    pub planet: Graha,
    #[serde(rename = "Start_Date")]
    pub start_date: NaiveDate,
    #[serde(rename = "End_Date")]
    pub end_date: NaiveDate,
    pub years: u32,
}

/// Vimshottari mahadasha sequence from birth
#[derive(Debug, Clone, Serialize)]
pub struct VimshottariDasha {
    #[serde(rename = "Birth_Moon_Longitude")]
    pub birth_moon_longitude: f64,
    #[serde(rename = "Nakshatra_Lord")]
    pub nakshatra_lord: Graha,
    #[serde(rename = "Vimshottari_Dasha")]
    pub periods: Vec<DashaPeriod>,
}
