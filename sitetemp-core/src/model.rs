use serde::{Deserialize, Serialize};

/// Fallback when a clicked object carries no usable coordinates:
/// Almería, Spain.
const FALLBACK_COORDINATE: Coordinate = Coordinate { latitude: 36.8381, longitude: -2.4597 };

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub fn new(latitude: f64, longitude: f64) -> anyhow::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(anyhow::anyhow!("Latitude {latitude} is outside [-90, 90]"));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(anyhow::anyhow!("Longitude {longitude} is outside [-180, 180]"));
        }
        Ok(Self { latitude, longitude })
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        FALLBACK_COORDINATE
    }
}

/// One observation: an 8-12 digit date/time code and a Celsius value.
/// Fixed-width codes sort chronologically, so series ordering follows
/// `time_key`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemperaturePoint {
    pub time_key: String,
    pub celsius: f64,
}

/// Chronologically ascending, at most 24 points.
pub type TemperatureSeries = Vec<TemperaturePoint>;
