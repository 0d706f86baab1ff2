// src/webhook.rs
//! Request and response types of the plugin's webhook endpoint

use crate::error::{PluginError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Body sent to the phone after a push once a stop was requested. The
/// Shortcuts automation checks for it and stops pushing.
pub const STOP_HINT: &str = "stop";

/// Body returned for every call made before the host signaled readiness
pub const NOT_RUNNING: &str = "Not running yet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Other,
}

impl FromStr for Method {
    type Err = PluginError;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(PluginError::Http("empty request method".to_string()));
        }

        Ok(match s.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "HEAD" => Method::Head,
            "POST" => Method::Post,
            "PUT" => Method::Put,
            "DELETE" => Method::Delete,
            _ => Method::Other,
        })
    }
}

/// A call to the webhook, with the path relative to the plugin's namespace
/// (`send_gps`, `get_gps`, `stop`, ...).
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRequest {
    pub method: Method,
    pub path: String,
    pub query: BTreeMap<String, String>,
}

impl WebhookRequest {
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            path: path.to_string(),
            query: BTreeMap::new(),
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn with_param(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    /// Build a request from a target such as `send_gps?lat=1.5&lon=2&alt=3%2C5`.
    /// Query keys and values are form-decoded (`+` is a space), the path only
    /// has its `%XX` escapes decoded. The first occurrence of a repeated key
    /// wins.
    pub fn from_target(method: Method, target: &str) -> Self {
        let (path, query_string) = match target.split_once('?') {
            Some((path, query)) => (path, query),
            None => (target, ""),
        };

        let mut query = BTreeMap::new();
        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            query.entry(percent_decode(key)).or_insert_with(|| percent_decode(value));
        }

        Self {
            method,
            path: percent_decode_path(path),
            query,
        }
    }
}

/// Decode a query key or value: `%XX` escapes and `+` as space. Malformed
/// escapes are kept verbatim.
pub fn percent_decode(input: &str) -> String {
    decode(input, true)
}

/// Decode a path segment. `+` is literal outside the query.
pub fn percent_decode_path(input: &str) -> String {
    decode(input, false)
}

fn decode(input: &str, plus_as_space: bool) -> String {
    let bytes = input.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'+' if plus_as_space => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' => {
                let high = bytes.get(i + 1).copied().and_then(hex_value);
                let low = bytes.get(i + 2).copied().and_then(hex_value);
                match (high, low) {
                    (Some(high), Some(low)) => {
                        decoded.push(high << 4 | low);
                        i += 3;
                    }
                    _ => {
                        decoded.push(b'%');
                        i += 1;
                    }
                }
            }
            b => {
                decoded.push(b);
                i += 1;
            }
        }
    }

    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum WebhookResponse {
    Empty,
    Text(String),
    Json(serde_json::Value),
}

impl WebhookResponse {
    pub fn content_type(&self) -> &'static str {
        match self {
            WebhookResponse::Json(_) => "application/json",
            WebhookResponse::Empty | WebhookResponse::Text(_) => "text/plain; charset=utf-8",
        }
    }

    pub fn body(&self) -> String {
        match self {
            WebhookResponse::Empty => String::new(),
            WebhookResponse::Text(text) => text.clone(),
            WebhookResponse::Json(value) => value.to_string(),
        }
    }
}

impl fmt::Display for WebhookResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.body())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_from_target_splits_query() {
        let request = WebhookRequest::from_target(Method::Get, "send_gps?lat=48.1&lon=11.5&alt=545%2C4");
        assert_eq!(request.path, "send_gps");
        assert_eq!(request.query.get("lat").map(String::as_str), Some("48.1"));
        assert_eq!(request.query.get("lon").map(String::as_str), Some("11.5"));
        assert_eq!(request.query.get("alt").map(String::as_str), Some("545,4"));
    }

    #[test]
    fn test_from_target_without_query() {
        let request = WebhookRequest::from_target(Method::Get, "get_gps");
        assert_eq!(request, WebhookRequest::get("get_gps"));
    }

    #[test]
    fn test_first_repeated_key_wins() {
        let request = WebhookRequest::from_target(Method::Get, "send_gps?lat=1&lat=2&flag");
        assert_eq!(request.query.get("lat").map(String::as_str), Some("1"));
        assert_eq!(request.query.get("flag").map(String::as_str), Some(""));
    }

    #[rstest]
    #[case("a%20b", "a b")]
    #[case("a+b", "a b")]
    #[case("100%", "100%")]
    #[case("%zz1", "%zz1")]
    #[case("%2c", ",")]
    fn test_percent_decode(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(percent_decode(input), expected);
    }

    #[rstest]
    #[case("a%20b", "a b")]
    #[case("a+b", "a+b")]
    #[case("%2B", "+")]
    #[case("100%", "100%")]
    fn test_percent_decode_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(percent_decode_path(input), expected);
    }

    #[test]
    fn test_plus_is_a_space_only_in_the_query() {
        let request = WebhookRequest::from_target(Method::Get, "a+b?x=c+d&e+f=g");
        assert_eq!(request.path, "a+b");
        assert_eq!(request.query.get("x").map(String::as_str), Some("c d"));
        assert_eq!(request.query.get("e f").map(String::as_str), Some("g"));
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
        assert_eq!("PATCH".parse::<Method>().unwrap(), Method::Other);
        assert!("".parse::<Method>().is_err());
    }

    #[test]
    fn test_response_bodies() {
        assert_eq!(WebhookResponse::Empty.body(), "");
        assert_eq!(WebhookResponse::Text(STOP_HINT.to_string()).body(), "stop");
        assert_eq!(WebhookResponse::Json(json!({})).body(), "{}");
        assert_eq!(WebhookResponse::Json(json!({})).content_type(), "application/json");
    }
}
