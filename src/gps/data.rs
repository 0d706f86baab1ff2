// src/gps/data.rs
//! The cached GPS fix pushed by the phone

use crate::error::Result;
use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Fixed accuracy reported with every fix, in meters. The phone does not send
/// one but wigle-style consumers of the `.gps.json` files require the field.
pub const ACCURACY_METERS: u32 = 10;

/// Format of the `Updated` field: UTC, microseconds, no zone suffix
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A single coordinate reading.
///
/// Serialized with the key names downstream handshake tooling expects:
/// `Latitude`, `Longitude`, `Altitude`, `Updated`, `Accuracy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: f64,
    #[serde(with = "updated_format")]
    pub updated: DateTime<Utc>,
    pub accuracy: u32,
}

impl Coordinates {
    /// Create a reading stamped with the current UTC time, truncated to
    /// microseconds
    pub fn new(latitude: f64, longitude: f64, altitude: f64) -> Self {
        Self::at(latitude, longitude, altitude, Utc::now().trunc_subsecs(6))
    }

    pub fn at(latitude: f64, longitude: f64, altitude: f64, updated: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            altitude,
            updated,
            accuracy: ACCURACY_METERS,
        }
    }

    /// A zero latitude or longitude means the phone had no fix yet, not a
    /// position near the origin. Non-finite values are never a fix.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite() && self.latitude != 0.0 && self.longitude != 0.0
    }

    /// `Updated` as it appears in JSON output
    pub fn updated_string(&self) -> String {
        self.updated.format(TIMESTAMP_FORMAT).to_string()
    }

    pub fn to_json(&self) -> serde_json::Value {
        // Plain struct of numbers and strings, serialization cannot fail
        serde_json::to_value(self).unwrap_or_default()
    }

    /// Write the reading as a JSON document, replacing any existing file
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }
}

mod updated_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(updated: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&updated.format(TIMESTAMP_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let naive = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT).map_err(serde::de::Error::custom)?;
        Ok(Utc.from_utc_datetime(&naive))
    }
}

/// Parse an `Updated` string back into a timestamp
pub fn parse_updated(raw: &str) -> Option<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
