// src/display/mod.rs
//! Status display integration: widgets, placement and text formatting

pub mod format;
pub mod layout;
pub mod terminal;

use crate::error::{PluginError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Pixel coordinates on the status display
pub type Position = (i32, i32);

pub const ELEMENT_COORDINATES: &str = "coordinates";
pub const ELEMENT_LATITUDE: &str = "latitude";
pub const ELEMENT_LONGITUDE: &str = "longitude";
pub const ELEMENT_ALTITUDE: &str = "altitude";

/// Every widget name the plugin may have added
pub const ALL_ELEMENTS: [&str; 4] = [ELEMENT_LATITUDE, ELEMENT_LONGITUDE, ELEMENT_ALTITUDE, ELEMENT_COORDINATES];

/// Display panels the host can drive. Each has its own widget placement preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DisplayHardware {
    #[serde(rename = "waveshare_v2")]
    WaveshareV2,
    #[serde(rename = "waveshare_v1")]
    WaveshareV1,
    #[serde(rename = "inky")]
    Inky,
    #[serde(rename = "waveshare144lcd")]
    Waveshare144Lcd,
    #[serde(rename = "dfrobot_v2")]
    DfrobotV2,
    #[serde(rename = "other")]
    Other,
}

impl DisplayHardware {
    pub fn name(&self) -> &'static str {
        match self {
            DisplayHardware::WaveshareV2 => "waveshare_v2",
            DisplayHardware::WaveshareV1 => "waveshare_v1",
            DisplayHardware::Inky => "inky",
            DisplayHardware::Waveshare144Lcd => "waveshare144lcd",
            DisplayHardware::DfrobotV2 => "dfrobot_v2",
            DisplayHardware::Other => "other",
        }
    }
}

impl fmt::Display for DisplayHardware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DisplayHardware {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "waveshare_v2" | "waveshare2" => Ok(DisplayHardware::WaveshareV2),
            "waveshare_v1" | "waveshare1" => Ok(DisplayHardware::WaveshareV1),
            "inky" => Ok(DisplayHardware::Inky),
            "waveshare144lcd" => Ok(DisplayHardware::Waveshare144Lcd),
            "dfrobot_v2" | "dfrobot2" => Ok(DisplayHardware::DfrobotV2),
            "other" => Ok(DisplayHardware::Other),
            other => Err(PluginError::Config(format!("unknown display hardware '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Small,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Black,
}

/// A "label: value" text widget
#[derive(Debug, Clone, PartialEq)]
pub struct LabeledValue {
    pub label: String,
    pub value: String,
    pub position: Position,
    pub label_spacing: i32,
    pub label_font: Font,
    pub text_font: Font,
    pub color: Color,
}

impl LabeledValue {
    /// Small black widget showing `-` until the first fix arrives
    pub fn small(label: &str, position: Position) -> Self {
        Self {
            label: label.to_string(),
            value: "-".to_string(),
            position,
            label_spacing: 0,
            label_font: Font::Small,
            text_font: Font::Small,
            color: Color::Black,
        }
    }
}

/// The host's status display as seen by the plugin.
///
/// Hosts hand it to the UI hooks wrapped in their UI lock (`Mutex<V>`).
pub trait View {
    /// Which panel is attached, for placement presets
    fn hardware(&self) -> DisplayHardware;

    fn add_element(&mut self, name: &str, element: LabeledValue);

    /// Fails with [`PluginError::UnknownElement`] if nothing was added under `name`
    fn remove_element(&mut self, name: &str) -> Result<()>;

    fn set(&mut self, name: &str, value: String);
}

/// In-memory widget board. Backs the terminal display and tests.
#[derive(Debug, Clone)]
pub struct StatusView {
    hardware: DisplayHardware,
    elements: BTreeMap<String, LabeledValue>,
}

impl StatusView {
    pub fn new(hardware: DisplayHardware) -> Self {
        Self {
            hardware,
            elements: BTreeMap::new(),
        }
    }

    pub fn element(&self, name: &str) -> Option<&LabeledValue> {
        self.elements.get(name)
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.elements.get(name).map(|e| e.value.as_str())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Widgets in reading order: top to bottom, then left to right
    pub fn elements_by_position(&self) -> Vec<(&str, &LabeledValue)> {
        let mut elements: Vec<_> = self.elements.iter().map(|(k, v)| (k.as_str(), v)).collect();
        elements.sort_by_key(|(_, e)| (e.position.1, e.position.0));
        elements
    }
}

impl View for StatusView {
    fn hardware(&self) -> DisplayHardware {
        self.hardware
    }

    fn add_element(&mut self, name: &str, element: LabeledValue) {
        self.elements.insert(name.to_string(), element);
    }

    fn remove_element(&mut self, name: &str) -> Result<()> {
        self.elements
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| PluginError::UnknownElement(name.to_string()))
    }

    fn set(&mut self, name: &str, value: String) {
        if let Some(element) = self.elements.get_mut(name) {
            element.value = value;
        }
    }
}
