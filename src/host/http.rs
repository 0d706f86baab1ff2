// src/host/http.rs
//! Minimal HTTP/1.1 front end routing webhook calls to the plugin

use crate::{
    error::{PluginError, Result},
    plugin::IphoneGps,
    webhook::{Method, WebhookRequest},
};
use std::{sync::Arc, time::Duration};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader},
    net::{TcpListener, TcpStream},
    time::timeout,
};
use tracing::{debug, info, warn};

/// Path prefix of the plugin's webhook namespace
pub const WEBHOOK_PREFIX: &str = "/plugins/iphone_gps/";

/// Request line plus headers; anything longer is answered with 400
const MAX_HEAD_BYTES: u64 = 8 * 1024;

/// Time a client gets to send its request head before it is answered with 408
const HEAD_TIMEOUT: Duration = Duration::from_secs(10);

/// What came in before the body
#[derive(Debug, PartialEq)]
enum Head {
    Request(String),
    Closed,
    TooLarge,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpReply {
    pub status: u16,
    pub reason: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpReply {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: 200,
            reason: "OK",
            content_type,
            body,
        }
    }

    fn error(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            content_type: "text/plain; charset=utf-8",
            body: reason.to_string(),
        }
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status,
            self.reason,
            self.content_type,
            self.body.len(),
            self.body
        )
        .into_bytes()
    }
}

/// Split a request line into method and target
pub fn parse_request_line(line: &str) -> Result<(Method, &str)> {
    let mut parts = line.split_whitespace();
    let method = parts.next().unwrap_or_default().parse::<Method>()?;
    let target = parts
        .next()
        .ok_or_else(|| PluginError::Http(format!("request line without target: '{}'", line.trim())))?;

    match parts.next() {
        Some(version) if version.starts_with("HTTP/") => Ok((method, target)),
        _ => Err(PluginError::Http(format!("malformed request line: '{}'", line.trim()))),
    }
}

/// Answer a single request line
pub fn route(request_line: &str, plugin: &IphoneGps) -> HttpReply {
    let (method, target) = match parse_request_line(request_line) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(error = %e, "rejecting request");
            return HttpReply::error(400, "Bad Request");
        }
    };

    let Some(sub_target) = target.strip_prefix(WEBHOOK_PREFIX) else {
        return HttpReply::error(404, "Not Found");
    };

    let request = WebhookRequest::from_target(method, sub_target);
    let response = plugin.on_webhook(&request);
    HttpReply::ok(response.content_type(), response.body())
}

/// Accept connections until the task is dropped
pub async fn serve(listener: TcpListener, plugin: Arc<IphoneGps>) -> Result<()> {
    info!(addr = %listener.local_addr()?, "webhook listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let plugin = Arc::clone(&plugin);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, &plugin).await {
                warn!(%peer, error = %e, "webhook connection failed");
            }
        });
    }
}

/// Read the request line and drain the headers, bounded by size and time
async fn read_head<R: AsyncBufRead + Unpin>(reader: R, deadline: Duration) -> Result<Head> {
    match timeout(deadline, read_limited_head(reader)).await {
        Ok(head) => head,
        Err(_) => Ok(Head::TimedOut),
    }
}

async fn read_limited_head<R: AsyncBufRead + Unpin>(reader: R) -> Result<Head> {
    let mut head = reader.take(MAX_HEAD_BYTES);

    let mut request_line = String::new();
    if head.read_line(&mut request_line).await? == 0 {
        return Ok(Head::Closed);
    }
    if !request_line.ends_with('\n') && head.limit() == 0 {
        return Ok(Head::TooLarge);
    }

    // Headers are not needed, only drained
    let mut header = String::new();
    loop {
        header.clear();
        head.read_line(&mut header).await?;
        if !header.ends_with('\n') {
            // EOF or the byte limit before the blank line
            return Ok(if head.limit() == 0 { Head::TooLarge } else { Head::Request(request_line) });
        }
        if header.trim_end().is_empty() {
            return Ok(Head::Request(request_line));
        }
    }
}

async fn handle_connection(stream: TcpStream, plugin: &IphoneGps) -> Result<()> {
    let mut reader = BufReader::new(stream);

    let reply = match read_head(&mut reader, HEAD_TIMEOUT).await? {
        Head::Request(request_line) => {
            let reply = route(&request_line, plugin);
            debug!(request = request_line.trim_end(), status = reply.status, "webhook request");
            reply
        }
        Head::Closed => return Ok(()),
        Head::TooLarge => {
            debug!(limit = MAX_HEAD_BYTES, "request head too large");
            HttpReply::error(400, "Bad Request")
        }
        Head::TimedOut => {
            debug!(timeout = ?HEAD_TIMEOUT, "request head timed out");
            HttpReply::error(408, "Request Timeout")
        }
    };

    let mut stream = reader.into_inner();
    stream.write_all(&reply.to_bytes()).await?;
    stream.shutdown().await?;
    Ok(())
}
