//! Minimal HTTP/1.0 client
//!
//! Sends one GET request and reads the response until the server closes the
//! connection, which is how every `warden` response ends.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use bytes::BytesMut;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use url::Url;

use crate::http::headers::HeaderTable;

/// How long to wait for the TCP connection to be established
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default buffer size for reading the response
const BUFFER_SIZE: usize = 8192;

/// A response as received from the server.
#[derive(Debug)]
pub struct FetchedResponse {
    pub status: u16,
    pub reason: String,
    pub headers: HeaderTable,
    pub body: Vec<u8>,
}

/// Fetches `url` with a GET request.
pub async fn fetch(url: &str) -> Result<FetchedResponse> {
    let url = Url::parse(url).context("Invalid URL")?;
    if url.scheme() != "http" {
        bail!("Unsupported URL scheme: {}", url.scheme());
    }

    let host = url.host_str().context("URL missing host")?;
    let port = url.port_or_known_default().unwrap_or(80);

    let mut stream = timeout(CONNECT_TIMEOUT, TcpStream::connect((host, port)))
        .await
        .context("Connection timeout")?
        .with_context(|| format!("Failed to connect to {host}:{port}"))?;

    tracing::debug!(host, port, "Connected");

    let request = build_request(&url);
    stream.write_all(&request).await?;
    stream.flush().await?;

    let raw = read_to_close(&mut stream).await?;
    parse_response(&raw)
}

/// Builds the request bytes for `url`.
pub fn build_request(url: &Url) -> Vec<u8> {
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    };

    format!("GET {target} HTTP/1.0\r\nHost: {host}\r\n\r\n").into_bytes()
}

async fn read_to_close(stream: &mut TcpStream) -> Result<BytesMut> {
    let mut buffer = BytesMut::with_capacity(BUFFER_SIZE);
    loop {
        let n = stream.read_buf(&mut buffer).await?;
        if n == 0 {
            return Ok(buffer);
        }
    }
}

/// Splits a complete raw response into status, headers and body.
pub fn parse_response(raw: &[u8]) -> Result<FetchedResponse> {
    let headers_end = raw
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .context("Connection closed before complete response received")?;

    let head = std::str::from_utf8(&raw[..headers_end]).context("Response head is not UTF-8")?;
    let mut lines = head.split("\r\n");

    let status_line = lines.next().context("Empty response")?;
    let mut parts = status_line.splitn(3, ' ');
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        bail!("Invalid status line: {status_line:?}");
    }
    let status = parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .with_context(|| format!("Invalid status code in {status_line:?}"))?;
    let reason = parts.next().unwrap_or_default().to_string();

    let headers = lines
        .map(|line| {
            line.split_once(':')
                .map(|(name, value)| (name.trim(), value.trim()))
                .with_context(|| format!("Invalid header line: {line:?}"))
        })
        .collect::<anyhow::Result<HeaderTable>>()?;

    Ok(FetchedResponse {
        status,
        reason,
        headers,
        body: raw[headers_end + 4..].to_vec(),
    })
}
