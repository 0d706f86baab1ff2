// src/lib.rs
//! iPhone GPS plugin
//!
//! Receives GPS fixes pushed by an iPhone Shortcuts automation over a webhook,
//! shows the latest one on the status display and saves it as a `.gps.json`
//! file next to every captured handshake.

pub mod config;
pub mod display;
pub mod error;
pub mod gps;
pub mod handshake;
pub mod host;
pub mod plugin;
pub mod webhook;

// Re-export main types for convenience
pub use config::{HostConfig, PluginOptions};
pub use display::{DisplayHardware, LabeledValue, StatusView, View};
pub use error::{PluginError, Result};
pub use gps::Coordinates;
pub use plugin::IphoneGps;
pub use webhook::{Method, WebhookRequest, WebhookResponse};
