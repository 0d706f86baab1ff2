// src/display/layout.rs
//! Widget placement for the expanded and compact views

use super::{DisplayHardware, Position};
use crate::config::PluginOptions;
use tracing::warn;

/// Horizontal indent of the latitude and altitude lines relative to the
/// longitude line, so the values line up after the shorter labels.
pub const LABEL_OFFSET: i32 = 5;

/// Where the three lines go. The compact widget uses `latitude`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub latitude: Position,
    pub longitude: Position,
    pub altitude: Position,
}

impl Layout {
    /// Lines anchored at a user-supplied `x,y`. `None` if a line would
    /// fall outside the `i32` range.
    pub fn manual((x, y): Position, line_spacing: i32) -> Option<Self> {
        let indented = x.checked_add(LABEL_OFFSET)?;
        let second = y.checked_add(line_spacing)?;
        let third = y.checked_add(line_spacing.checked_mul(2)?)?;

        Some(Self {
            latitude: (indented, y),
            longitude: (x, second),
            altitude: (indented, third),
        })
    }

    /// Built-in placement for a display panel
    pub fn preset(hardware: DisplayHardware) -> Self {
        let (latitude, longitude, altitude) = match hardware {
            DisplayHardware::WaveshareV2 => ((127, 74), (122, 84), (127, 94)),
            DisplayHardware::WaveshareV1 => ((130, 70), (125, 80), (130, 90)),
            DisplayHardware::Inky => ((127, 60), (122, 70), (127, 80)),
            DisplayHardware::Waveshare144Lcd => ((67, 73), (62, 83), (67, 93)),
            DisplayHardware::DfrobotV2 => ((127, 74), (122, 84), (127, 94)),
            DisplayHardware::Other => ((127, 51), (122, 61), (127, 71)),
        };

        Self {
            latitude,
            longitude,
            altitude,
        }
    }

    /// Manual position when configured and well formed, preset otherwise
    pub fn resolve(options: &PluginOptions, hardware: DisplayHardware) -> Self {
        let Some(anchor) = options.manual_position() else {
            return Self::preset(hardware);
        };

        let line_spacing = options.line_spacing();
        Self::manual(anchor, line_spacing).unwrap_or_else(|| {
            warn!(?anchor, line_spacing, "manual position out of range, using preset");
            Self::preset(hardware)
        })
    }
}
