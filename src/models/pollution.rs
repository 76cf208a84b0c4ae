//! Data structures for the air pollution API.
//!
//! Includes:
//! - Query parameters for the current, forecast and historical endpoints.
//! - The decoded response (`PollutionResult`) and its per-hour entries.
//! - `AqiLevel`, the qualitative name of the API's 1-5 air quality index.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Geographical coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    #[serde(rename = "lat", default, deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(rename = "lon", default, deserialize_with = "null_as_default")]
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Parameters for the current and forecast pollution endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PollutionQuery {
    pub location: Coordinates,
}

impl PollutionQuery {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            location: Coordinates::new(latitude, longitude),
        }
    }
}

/// Parameters for the historical pollution endpoint.
///
/// `start` and `end` are unix seconds (UTC). They are sent exactly as given;
/// keeping `start <= end` is up to the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoricalPollutionQuery {
    pub location: Coordinates,
    pub start: i64,
    pub end: i64,
}

impl HistoricalPollutionQuery {
    pub fn new(location: Coordinates, start: i64, end: i64) -> Self {
        Self {
            location,
            start,
            end,
        }
    }

    /// Builds a query from a `chrono` UTC range, truncating to whole seconds.
    pub fn from_range(location: Coordinates, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self::new(location, start.timestamp(), end.timestamp())
    }
}

/// Decoded response of any of the three pollution endpoints.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PollutionResult {
    /// Top-level `dt`, kept as text whether the API sent a string or a number.
    #[serde(rename = "dt", default, deserialize_with = "opaque_timestamp")]
    pub timestamp: String,
    #[serde(rename = "coord", default, deserialize_with = "null_as_default")]
    pub location: Coordinates,
    /// Entries in the order the API returned them.
    #[serde(rename = "list", default, deserialize_with = "null_as_default")]
    pub entries: Vec<PollutionEntry>,
}

impl PollutionResult {
    /// Returns the entry with the highest AQI. On ties the earliest entry wins.
    pub fn worst_entry(&self) -> Option<&PollutionEntry> {
        self.entries.iter().fold(None, |worst, entry| match worst {
            Some(w) if w.air_quality_index >= entry.air_quality_index => Some(w),
            _ => Some(entry),
        })
    }
}

/// A single observation or forecast hour.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct PollutionEntry {
    /// Unix seconds (UTC).
    #[serde(rename = "dt", default, deserialize_with = "null_as_default")]
    pub timestamp: i64,
    /// The API nests the index as `main.aqi`.
    #[serde(
        rename = "main",
        default,
        deserialize_with = "aqi_from_main",
        serialize_with = "aqi_to_main"
    )]
    pub air_quality_index: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub components: Components,
}

impl PollutionEntry {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::<Utc>::from_timestamp(self.timestamp, 0)
    }

    pub fn level(&self) -> AqiLevel {
        AqiLevel::from_index(self.air_quality_index)
    }
}

/// Pollutant concentrations in µg/m³.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Components {
    #[serde(deserialize_with = "null_as_default")]
    pub co: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub no: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub no2: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub o3: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub so2: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pm2_5: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub pm10: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub nh3: f64,
}

impl Components {
    pub const NAMES: [&'static str; 8] = ["CO", "NO", "NO2", "O3", "SO2", "PM2.5", "PM10", "NH3"];

    /// Pairs of (display name, concentration) in `NAMES` order.
    pub fn named(&self) -> [(&'static str, f64); 8] {
        let [co, no, no2, o3, so2, pm2_5, pm10, nh3] = Self::NAMES;
        [
            (co, self.co),
            (no, self.no),
            (no2, self.no2),
            (o3, self.o3),
            (so2, self.so2),
            (pm2_5, self.pm2_5),
            (pm10, self.pm10),
            (nh3, self.nh3),
        ]
    }
}

/// Qualitative name of the API's air quality index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AqiLevel {
    Good,
    Fair,
    Moderate,
    Poor,
    VeryPoor,
    Unknown,
}

impl AqiLevel {
    /// Maps 1..=5 to a level; fractional or out-of-range values are `Unknown`.
    pub fn from_index(aqi: f64) -> Self {
        if aqi.fract() != 0.0 {
            return AqiLevel::Unknown;
        }
        match aqi as i64 {
            1 => AqiLevel::Good,
            2 => AqiLevel::Fair,
            3 => AqiLevel::Moderate,
            4 => AqiLevel::Poor,
            5 => AqiLevel::VeryPoor,
            _ => AqiLevel::Unknown,
        }
    }
}

impl fmt::Display for AqiLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AqiLevel::Good => "Good",
            AqiLevel::Fair => "Fair",
            AqiLevel::Moderate => "Moderate",
            AqiLevel::Poor => "Poor",
            AqiLevel::VeryPoor => "Very Poor",
            AqiLevel::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

// --- serde helpers ---

/// A JSON `null` leaves the field at its zero value, like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

fn opaque_timestamp<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

#[derive(Deserialize, Serialize, Default)]
struct MainBlock {
    #[serde(default, deserialize_with = "null_as_default")]
    aqi: f64,
}

fn aqi_from_main<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<MainBlock>::deserialize(deserializer).map(|main| main.unwrap_or_default().aqi)
}

fn aqi_to_main<S>(aqi: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    MainBlock { aqi: *aqi }.serialize(serializer)
}
