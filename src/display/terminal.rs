// src/display/terminal.rs
//! Terminal rendering of the status widgets for the standalone host

use super::{StatusView, View};
use crate::{
    error::Result,
    plugin::IphoneGps,
};
use chrono::Utc;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    execute,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType, DisableLineWrap, EnableLineWrap},
};
use std::{
    io::{self, Write},
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    time::Duration,
};
use tokio::time::sleep;

pub struct TerminalDisplay {
    refresh: Duration,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self {
            refresh: Duration::from_secs(1),
        }
    }

    /// Redraw the widgets once per refresh until `running` is cleared or
    /// Ctrl+C is pressed. Each frame first runs the plugin's UI update hook.
    pub async fn run(
        &self,
        plugin: Arc<IphoneGps>,
        ui: Arc<Mutex<StatusView>>,
        running: Arc<AtomicBool>,
    ) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, Hide, DisableLineWrap)?;

        let running_clone = Arc::clone(&running);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                running_clone.store(false, Ordering::Relaxed);
            }
        });

        while running.load(Ordering::Relaxed) {
            plugin.on_ui_update(&ui);

            execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;

            let view = ui.lock().unwrap_or_else(PoisonError::into_inner).clone();
            self.render_display(&mut stdout, &view, &plugin)?;

            stdout.flush()?;
            sleep(self.refresh).await;
        }

        execute!(stdout, Show, EnableLineWrap)?;
        println!("\nShutting down...");
        Ok(())
    }

    /// Render one frame
    pub fn render_display(&self, stdout: &mut impl Write, view: &StatusView, plugin: &IphoneGps) -> Result<()> {
        execute!(
            stdout,
            SetForegroundColor(TermColor::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print(format!("iPhone GPS {} - {} display", IphoneGps::VERSION, view.hardware())),
            Print("\n"),
            Print("=".repeat(60)),
            Print("\n"),
            ResetColor
        )?;

        self.render_status_section(stdout, plugin)?;
        self.render_widget_section(stdout, view)?;

        execute!(
            stdout,
            SetForegroundColor(TermColor::Green),
            Print("=".repeat(60)),
            Print("\n"),
            Print("Press Ctrl+C to exit"),
            Print("\n"),
            ResetColor
        )?;

        Ok(())
    }

    fn render_status_section(&self, stdout: &mut impl Write, plugin: &IphoneGps) -> Result<()> {
        execute!(stdout, SetForegroundColor(TermColor::Yellow), Print("STATUS:\n"), ResetColor)?;

        let state = match (plugin.is_running(), plugin.is_stopped()) {
            (false, _) => "starting",
            (true, false) => "running",
            (true, true) => "stopped",
        };
        execute!(stdout, Print(format!("  State:       {}\n", state)))?;

        let last_fix = match plugin.coordinates() {
            Some(coords) => {
                let age = Utc::now().signed_duration_since(coords.updated).num_seconds();
                format!("{} UTC ({}s ago)", coords.updated.format("%Y-%m-%d %H:%M:%S"), age)
            }
            None => "No data received".to_string(),
        };
        execute!(stdout, Print(format!("  Last Update: {}\n\n", last_fix)))?;

        Ok(())
    }

    fn render_widget_section(&self, stdout: &mut impl Write, view: &StatusView) -> Result<()> {
        execute!(stdout, SetForegroundColor(TermColor::Cyan), Print("DISPLAY:\n"), ResetColor)?;

        if view.is_empty() {
            execute!(stdout, Print("  No widgets\n\n"))?;
            return Ok(());
        }

        for (_, element) in view.elements_by_position() {
            let (x, y) = element.position;
            execute!(
                stdout,
                Print(format!("  [{:>3},{:>3}] {} {}\n", x, y, element.label, element.value))
            )?;
        }

        execute!(stdout, Print("\n"))?;
        Ok(())
    }
}

impl Default for TerminalDisplay {
    fn default() -> Self {
        Self::new()
    }
}
