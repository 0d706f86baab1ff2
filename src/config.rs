// src/config.rs
//! Plugin options and standalone host configuration

use crate::display::DisplayHardware;
use crate::error::{PluginError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Vertical distance between the expanded-view lines when no `linespacing` is set
pub const DEFAULT_LINE_SPACING: i32 = 10;

/// Options the host hands to the plugin (`main.plugins.iphone_gps.*`).
///
/// Every key is optional; a missing key means "use the default".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginOptions {
    pub enabled: bool,
    pub compact_view: Option<bool>,
    pub linespacing: Option<LineSpacing>,
    pub position: Option<String>,
    pub use_last_loc: bool,
}

/// Line spacing as found in configuration files, where it is sometimes
/// written as a quoted number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LineSpacing {
    Number(i64),
    Text(String),
}

impl PluginOptions {
    /// Resolved line spacing. Unparsable values fall back to the default.
    pub fn line_spacing(&self) -> i32 {
        match &self.linespacing {
            None => DEFAULT_LINE_SPACING,
            Some(LineSpacing::Number(n)) => i32::try_from(*n).unwrap_or_else(|_| {
                tracing::warn!(linespacing = n, "line spacing out of range, using default");
                DEFAULT_LINE_SPACING
            }),
            Some(LineSpacing::Text(raw)) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(linespacing = %raw, "line spacing is not a number, using default");
                DEFAULT_LINE_SPACING
            }),
        }
    }

    /// Manual `x,y` anchor for the widgets, if one is configured and well formed
    pub fn manual_position(&self) -> Option<(i32, i32)> {
        let raw = self.position.as_deref()?;
        match parse_position(raw) {
            Ok(pos) => Some(pos),
            Err(e) => {
                tracing::debug!(position = raw, error = %e, "ignoring manual position");
                None
            }
        }
    }
}

/// Parse an `"x,y"` pair, tolerating whitespace around each number
pub fn parse_position(raw: &str) -> Result<(i32, i32)> {
    let parts: Vec<&str> = raw.split(',').collect();
    if parts.len() < 2 {
        return Err(PluginError::Config(format!("position '{}' is not an x,y pair", raw)));
    }

    // Only the first two components are used, the rest must still be numeric
    let values = parts
        .iter()
        .map(|p| {
            p.trim()
                .parse::<i32>()
                .map_err(|e| PluginError::Config(format!("invalid position component '{}': {}", p, e)))
        })
        .collect::<Result<Vec<i32>>>()?;

    Ok((values[0], values[1]))
}

/// Configuration of the standalone host that runs the plugin outside the agent
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub bind: String,
    pub capture_dir: Option<PathBuf>,
    pub scan_interval_secs: u64,
    pub hardware: DisplayHardware,
    pub plugin: PluginOptions,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            capture_dir: None,
            scan_interval_secs: 5,
            hardware: DisplayHardware::Other,
            plugin: PluginOptions {
                enabled: true,
                ..PluginOptions::default()
            },
        }
    }
}

impl HostConfig {
    /// Load configuration from `path`, or from the default location.
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)
            .map_err(|e| PluginError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = serde_json::from_str(&contents)
            .map_err(|e| PluginError::Config(format!("Failed to parse config file: {}", e)))?;

        Ok(config)
    }

    /// Save configuration as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| PluginError::Config(format!("Failed to create config directory: {}", e)))?;
            }
        }

        let contents = serde_json::to_string_pretty(self)?;

        std::fs::write(path, contents)
            .map_err(|e| PluginError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }

    /// `$HOME/.config/iphone-gps/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = std::env::var("HOME")
            .map_err(|_| PluginError::Config("HOME environment variable not set".to_string()))?;

        Ok(PathBuf::from(home).join(".config").join("iphone-gps").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_missing_keys_use_defaults() {
        let options: PluginOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PluginOptions::default());
        assert_eq!(options.line_spacing(), 10);
        assert_eq!(options.manual_position(), None);
        assert!(!options.use_last_loc);
    }

    #[rstest]
    #[case(r#"{"linespacing": 15}"#, 15)]
    #[case(r#"{"linespacing": "12"}"#, 12)]
    #[case(r#"{"linespacing": "wide"}"#, 10)]
    fn test_line_spacing(#[case] json: &str, #[case] expected: i32) {
        let options: PluginOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.line_spacing(), expected);
    }

    #[rstest]
    #[case("10,20", Some((10, 20)))]
    #[case(" 3 , 4 ", Some((3, 4)))]
    #[case("1,2,3", Some((1, 2)))]
    #[case("10", None)]
    #[case("a,b", None)]
    #[case("", None)]
    fn test_manual_position(#[case] raw: &str, #[case] expected: Option<(i32, i32)>) {
        let options = PluginOptions {
            position: Some(raw.to_string()),
            ..PluginOptions::default()
        };
        assert_eq!(options.manual_position(), expected);
    }

    #[test]
    fn test_full_options() {
        let json = r#"{"enabled": true, "compact_view": true, "position": "5,6", "use_last_loc": true}"#;
        let options: PluginOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.compact_view, Some(true));
        assert_eq!(options.manual_position(), Some((5, 6)));
        assert!(options.use_last_loc);
    }

    #[test]
    fn test_host_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = HostConfig::default();
        config.bind = "127.0.0.1:9000".to_string();
        config.hardware = DisplayHardware::Inky;
        config.plugin.compact_view = Some(true);
        config.save(&path).unwrap();

        let loaded = HostConfig::load(Some(&path)).unwrap();
        assert_eq!(loaded.bind, "127.0.0.1:9000");
        assert_eq!(loaded.hardware, DisplayHardware::Inky);
        assert_eq!(loaded.plugin.compact_view, Some(true));
    }

    #[test]
    fn test_missing_host_config_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = HostConfig::load(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(loaded.bind, "0.0.0.0:8080");
        assert_eq!(loaded.scan_interval_secs, 5);
        assert!(loaded.plugin.enabled);
    }
}
