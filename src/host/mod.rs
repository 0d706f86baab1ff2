// src/host/mod.rs
//! Standalone host: runs the plugin without the agent, wiring up the
//! webhook listener, capture watcher and terminal display.

pub mod capture;
pub mod http;

use crate::{
    config::HostConfig,
    display::{terminal::TerminalDisplay, StatusView},
    error::{PluginError, Result},
    plugin::IphoneGps,
};
use std::{
    sync::{atomic::AtomicBool, Arc, Mutex},
    time::Duration,
};
use tokio::net::TcpListener;
use tracing::info;

/// Run the plugin until Ctrl+C.
///
/// Hooks are called in the host's order: loaded, config changed, UI setup,
/// ready; unload on shutdown.
pub async fn run(config: HostConfig, headless: bool) -> Result<()> {
    let plugin = Arc::new(IphoneGps::new(config.plugin.clone()));
    let ui = Arc::new(Mutex::new(StatusView::new(config.hardware)));

    plugin.on_loaded();
    plugin.on_config_changed(config.plugin.clone());
    plugin.on_ui_setup(&ui);

    let listener = TcpListener::bind(&config.bind)
        .await
        .map_err(|e| PluginError::Http(format!("Failed to bind {}: {}", config.bind, e)))?;
    let server = tokio::spawn(http::serve(listener, Arc::clone(&plugin)));

    let watcher = match &config.capture_dir {
        Some(dir) => {
            let watcher = capture::CaptureWatcher::new(dir)?;
            let interval = Duration::from_secs(config.scan_interval_secs.max(1));
            info!(dir = %dir.display(), ?interval, "watching handshake captures");
            Some(tokio::spawn(capture::watch(watcher, Arc::clone(&plugin), interval)))
        }
        None => None,
    };

    plugin.on_ready();

    if headless {
        tokio::signal::ctrl_c().await?;
    } else {
        let running = Arc::new(AtomicBool::new(true));
        TerminalDisplay::new().run(Arc::clone(&plugin), Arc::clone(&ui), running).await?;
    }

    server.abort();
    if let Some(watcher) = watcher {
        watcher.abort();
    }

    plugin.on_unload(&ui);
    Ok(())
}
