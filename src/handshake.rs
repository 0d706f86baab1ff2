// src/handshake.rs
//! Location files written next to captured handshakes

use crate::error::Result;
use crate::gps::Coordinates;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const CAPTURE_EXTENSION: &str = "pcap";
pub const LOCATION_EXTENSION: &str = "gps.json";

/// `/handshakes/ap_0011.pcap` -> `/handshakes/ap_0011.gps.json`.
///
/// Captures without a `.pcap` extension get `.gps.json` appended so the
/// capture itself is never overwritten.
pub fn location_path_for(capture: &Path) -> PathBuf {
    if capture.extension().map_or(false, |ext| ext == CAPTURE_EXTENSION) {
        capture.with_extension(LOCATION_EXTENSION)
    } else {
        let mut name = OsString::from(capture.as_os_str());
        name.push(".");
        name.push(LOCATION_EXTENSION);
        PathBuf::from(name)
    }
}

/// Write `coords` next to `capture` and return the written path
pub fn save_location(coords: &Coordinates, capture: &Path) -> Result<PathBuf> {
    let path = location_path_for(capture);
    coords.save_to(&path)?;
    Ok(path)
}
