// src/gps/query.rs
//! Parsing of the `send_gps` webhook parameters

use super::data::Coordinates;
use crate::error::{PluginError, Result};
use std::collections::BTreeMap;

/// Build a fresh reading from the `lat`, `lon` and `alt` query parameters.
///
/// All three are required. iOS may localize the altitude with a decimal
/// comma, so `alt` accepts either separator.
pub fn parse_send_gps(query: &BTreeMap<String, String>) -> Result<Coordinates> {
    let latitude = parse_number("lat", required(query, "lat")?)?;
    let longitude = parse_number("lon", required(query, "lon")?)?;
    let altitude = parse_number("alt", &required(query, "alt")?.replace(',', "."))?;

    Ok(Coordinates::new(latitude, longitude, altitude))
}

fn required<'a>(query: &'a BTreeMap<String, String>, key: &str) -> Result<&'a str> {
    query
        .get(key)
        .map(String::as_str)
        .ok_or_else(|| PluginError::Parse(format!("missing query parameter '{}'", key)))
}

/// Finite numbers only: `nan`, `inf` and out-of-range literals like `1e400`
/// cannot be written to JSON.
fn parse_number(key: &str, raw: &str) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|e| PluginError::Parse(format!("invalid value '{}' for '{}': {}", raw, key, e)))?;

    if !value.is_finite() {
        return Err(PluginError::Parse(format!("non-finite value '{}' for '{}'", raw, key)));
    }
    Ok(value)
}
