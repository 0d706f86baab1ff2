// src/plugin.rs
//! The plugin instance and its host hooks

use crate::{
    config::PluginOptions,
    display::{
        format::{compact_line, expanded_lines},
        layout::Layout,
        LabeledValue, View, ALL_ELEMENTS, ELEMENT_ALTITUDE, ELEMENT_COORDINATES, ELEMENT_LATITUDE,
        ELEMENT_LONGITUDE,
    },
    error::PluginError,
    gps::{query::parse_send_gps, Coordinates},
    handshake::{location_path_for, save_location},
    webhook::{Method, WebhookRequest, WebhookResponse, NOT_RUNNING, STOP_HINT},
};
use serde_json::json;
use std::{
    path::{Path, PathBuf},
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex, MutexGuard, PoisonError, RwLock,
    },
};
use tracing::{debug, info, warn};

/// Receives GPS fixes from the phone, shows them on the display and stores
/// them next to captured handshakes.
///
/// The host creates one instance and calls the `on_*` hooks from whichever
/// threads it likes; all hooks take `&self`.
pub struct IphoneGps {
    coordinates: RwLock<Option<Coordinates>>,
    options: RwLock<PluginOptions>,
    compact_view: AtomicBool,
    running: AtomicBool,
    stopped: AtomicBool,
}

impl IphoneGps {
    pub const NAME: &'static str = "iphone_gps";
    pub const AUTHOR: &'static str = "xentrify";
    pub const VERSION: &'static str = env!("CARGO_PKG_VERSION");
    pub const LICENSE: &'static str = "GPL3";
    pub const DESCRIPTION: &'static str = "Saves GPS coordinates whenever an handshake is captured. \
        Uses your iPhone's GPS via website requests and Shortcuts.";

    pub fn new(options: PluginOptions) -> Self {
        Self {
            coordinates: RwLock::new(None),
            compact_view: AtomicBool::new(options.compact_view.unwrap_or(false)),
            options: RwLock::new(options),
            running: AtomicBool::new(false),
            stopped: AtomicBool::new(false),
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    pub fn is_compact_view(&self) -> bool {
        self.compact_view.load(Ordering::SeqCst)
    }

    /// The last fix received, valid or not
    pub fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn options(&self) -> PluginOptions {
        self.options.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Last fix, only if it is a real position
    fn valid_coordinates(&self) -> Option<Coordinates> {
        self.coordinates().filter(Coordinates::is_valid)
    }

    fn store_coordinates(&self, coords: Coordinates) {
        *self.coordinates.write().unwrap_or_else(PoisonError::into_inner) = Some(coords);
    }

    pub fn on_loaded(&self) {
        info!(plugin = Self::NAME, version = Self::VERSION, "plugin loaded");
    }

    /// Replace the options. `compact_view` only changes when the new options
    /// carry the key.
    pub fn on_config_changed(&self, options: PluginOptions) {
        if let Some(compact) = options.compact_view {
            self.compact_view.store(compact, Ordering::SeqCst);
            info!(compact, "compact view configured");
        }
        *self.options.write().unwrap_or_else(PoisonError::into_inner) = options;
    }

    pub fn on_ready(&self) {
        info!("plugin ready");
        self.running.store(true, Ordering::SeqCst);
    }

    /// Handle a call under the plugin's webhook namespace
    pub fn on_webhook(&self, request: &WebhookRequest) -> WebhookResponse {
        if !self.is_running() {
            info!(path = %request.path, "webhook called but plugin is not running");
            return WebhookResponse::Text(NOT_RUNNING.to_string());
        }

        if request.method != Method::Get {
            return WebhookResponse::Empty;
        }

        let path = request.path.trim_start_matches('/');
        if path.starts_with("send_gps") {
            self.handle_send_gps(request)
        } else if path.starts_with("get_gps") {
            self.handle_get_gps()
        } else if path.contains("stop") {
            info!("stop requested, no longer accepting locations");
            self.stopped.store(true, Ordering::SeqCst);
            WebhookResponse::Empty
        } else {
            debug!(path, "unknown webhook path");
            WebhookResponse::Empty
        }
    }

    fn handle_send_gps(&self, request: &WebhookRequest) -> WebhookResponse {
        match parse_send_gps(&request.query) {
            Ok(coords) => {
                info!(
                    latitude = coords.latitude,
                    longitude = coords.longitude,
                    altitude = coords.altitude,
                    updated = %coords.updated_string(),
                    "updated coordinates"
                );
                self.store_coordinates(coords);
            }
            Err(e) => info!(error = %e, "ignoring location push"),
        }

        if self.is_stopped() {
            WebhookResponse::Text(STOP_HINT.to_string())
        } else {
            WebhookResponse::Empty
        }
    }

    fn handle_get_gps(&self) -> WebhookResponse {
        match self.coordinates() {
            Some(coords) if !self.is_stopped() => WebhookResponse::Json(coords.to_json()),
            _ => WebhookResponse::Json(json!({})),
        }
    }

    /// Save the current location next to a new capture.
    ///
    /// Returns the written file. Never fails: write errors are logged, since
    /// the host has no way to recover from a failing hook.
    pub fn on_handshake(&self, filename: &Path, access_point: &str, client_station: &str) -> Option<PathBuf> {
        if !self.is_running() {
            return None;
        }
        if self.is_stopped() && !self.options().use_last_loc {
            debug!(capture = %filename.display(), "stopped, not saving location");
            return None;
        }

        let Some(coords) = self.valid_coordinates() else {
            info!(capture = %filename.display(), "not saving GPS, no location available");
            return None;
        };

        info!(
            path = %location_path_for(filename).display(),
            access_point,
            client_station,
            latitude = coords.latitude,
            longitude = coords.longitude,
            "saving GPS"
        );

        match save_location(&coords, filename) {
            Ok(path) => Some(path),
            Err(e) => {
                warn!(capture = %filename.display(), error = %e, "failed to save GPS");
                None
            }
        }
    }

    /// Add the coordinate widgets for the configured view
    pub fn on_ui_setup<V: View>(&self, ui: &Mutex<V>) {
        let mut view = lock_ui(ui);
        let layout = Layout::resolve(&self.options(), view.hardware());

        if self.is_compact_view() {
            view.add_element(ELEMENT_COORDINATES, LabeledValue::small("coords", layout.latitude));
        } else {
            view.add_element(ELEMENT_LATITUDE, LabeledValue::small("lat:", layout.latitude));
            view.add_element(ELEMENT_LONGITUDE, LabeledValue::small("long:", layout.longitude));
            view.add_element(ELEMENT_ALTITUDE, LabeledValue::small("alt:", layout.altitude));
        }
    }

    /// Remove whatever widgets were added
    pub fn on_unload<V: View>(&self, ui: &Mutex<V>) {
        let mut view = lock_ui(ui);
        for name in ALL_ELEMENTS {
            match view.remove_element(name) {
                Ok(()) | Err(PluginError::UnknownElement(_)) => {}
                Err(e) => warn!(element = name, error = %e, "failed to remove element"),
            }
        }
        info!("plugin unloaded");
    }

    /// Refresh the widgets. Without a valid fix the previous text stays.
    pub fn on_ui_update<V: View>(&self, ui: &Mutex<V>) {
        let mut view = lock_ui(ui);
        let Some(coords) = self.valid_coordinates() else {
            return;
        };

        if self.is_compact_view() {
            view.set(ELEMENT_COORDINATES, compact_line(&coords));
        } else {
            let [latitude, longitude, altitude] = expanded_lines(&coords);
            view.set(ELEMENT_LATITUDE, latitude);
            view.set(ELEMENT_LONGITUDE, longitude);
            view.set(ELEMENT_ALTITUDE, altitude);
        }
    }
}

impl Default for IphoneGps {
    fn default() -> Self {
        Self::new(PluginOptions::default())
    }
}

fn lock_ui<V>(ui: &Mutex<V>) -> MutexGuard<'_, V> {
    ui.lock().unwrap_or_else(PoisonError::into_inner)
}
