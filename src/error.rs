// src/error.rs
//! Error types for the iPhone GPS plugin

use std::fmt;

pub type Result<T> = std::result::Result<T, PluginError>;

#[derive(Debug)]
pub enum PluginError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Parse(String),
    Config(String),
    Http(String),
    UnknownElement(String),
}

impl fmt::Display for PluginError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginError::Io(e) => write!(f, "IO error: {}", e),
            PluginError::Json(e) => write!(f, "JSON error: {}", e),
            PluginError::Parse(msg) => write!(f, "Parse error: {}", msg),
            PluginError::Config(msg) => write!(f, "Config error: {}", msg),
            PluginError::Http(msg) => write!(f, "HTTP error: {}", msg),
            PluginError::UnknownElement(name) => write!(f, "Unknown UI element: {}", name),
        }
    }
}

impl std::error::Error for PluginError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PluginError::Io(e) => Some(e),
            PluginError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PluginError {
    fn from(error: std::io::Error) -> Self {
        PluginError::Io(error)
    }
}

impl From<serde_json::Error> for PluginError {
    fn from(error: serde_json::Error) -> Self {
        PluginError::Json(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_keeps_source_through_anyhow() {
        let error = PluginError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(error.to_string(), "IO error: gone");

        let edge = anyhow::Error::from(error);
        assert!(edge.downcast_ref::<PluginError>().is_some());
        assert_eq!(edge.chain().count(), 2);
    }

    #[test]
    fn test_message_variants_have_no_source() {
        let error = PluginError::UnknownElement("coordinates".to_string());
        assert_eq!(error.to_string(), "Unknown UI element: coordinates");
        assert!(std::error::Error::source(&error).is_none());
    }
}
