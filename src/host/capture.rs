// src/host/capture.rs
//! Polls the handshake directory and reports new captures to the plugin

use crate::{error::Result, handshake::CAPTURE_EXTENSION, plugin::IphoneGps};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};
use tracing::{debug, warn};

pub struct CaptureWatcher {
    dir: PathBuf,
    seen: HashSet<PathBuf>,
}

impl CaptureWatcher {
    /// Captures already in `dir` count as seen
    pub fn new(dir: &Path) -> Result<Self> {
        let mut watcher = Self {
            dir: dir.to_path_buf(),
            seen: HashSet::new(),
        };
        let existing = watcher.poll()?;
        debug!(dir = %dir.display(), existing = existing.len(), "watching for captures");
        Ok(watcher)
    }

    /// New captures since the last poll, in name order
    pub fn poll(&mut self) -> Result<Vec<PathBuf>> {
        let mut fresh = Vec::new();

        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            let is_capture = path.is_file() && path.extension().map_or(false, |ext| ext == CAPTURE_EXTENSION);
            if is_capture && self.seen.insert(path.clone()) {
                fresh.push(path);
            }
        }

        fresh.sort();
        Ok(fresh)
    }
}

/// Captures are named `<ssid>_<bssid>.pcap`; split that into the access
/// point and station parts for logging.
pub fn capture_identities(capture: &Path) -> (String, String) {
    let stem = capture
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    match stem.rsplit_once('_') {
        Some((ap, station)) => (ap.to_string(), station.to_string()),
        None => (stem, String::new()),
    }
}

/// Poll forever, calling the handshake hook once per new capture
pub async fn watch(mut watcher: CaptureWatcher, plugin: Arc<IphoneGps>, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);

    loop {
        ticker.tick().await;

        let captures = match watcher.poll() {
            Ok(captures) => captures,
            Err(e) => {
                warn!(dir = %watcher.dir.display(), error = %e, "failed to scan captures");
                continue;
            }
        };

        for capture in captures {
            let (access_point, station) = capture_identities(&capture);
            plugin.on_handshake(&capture, &access_point, &station);
        }
    }
}
