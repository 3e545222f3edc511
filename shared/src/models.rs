use serde::{Deserialize, Serialize};

/// Day or night acquisition, as flagged by FIRMS.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum DayNight {
    #[default]
    D,
    N,
}

impl DayNight {
    /// Anything other than `N` counts as a day acquisition.
    pub fn from_flag(flag: &str) -> Self {
        match flag.trim() {
            "N" | "n" => DayNight::N,
            _ => DayNight::D,
        }
    }
}

/// One satellite-detected thermal anomaly.
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct FireData {
    pub latitude: f64,
    pub longitude: f64,
    pub brightness: f64,
    pub scan: f64,
    pub track: f64,
    pub acq_date: String,
    pub acq_time: String,
    pub satellite: String,
    pub confidence: f64,
    pub version: String,
    pub bright_t31: f64,
    pub frp: f64,
    pub daynight: DayNight,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct MapBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl From<&FireData> for LatLng {
    fn from(fire: &FireData) -> Self {
        LatLng {
            lat: fire.latitude,
            lng: fire.longitude,
        }
    }
}
