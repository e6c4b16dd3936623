//! HTTP transports.

use std::collections::HashMap;

use async_trait::async_trait;
use http::Uri;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::trace;

use crate::error::FetchError;
use crate::request::HttpRequest;
use crate::response::Response;
use crate::timeout::TimeoutConfig;

/// Sends one request and returns the raw response.
///
/// Implementations report transport problems as `FetchError::Network` and do
/// not interpret the status code.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<Response, FetchError>;
}

/// Plain HTTP/1.0 over a tokio TCP stream.
///
/// Each request opens a fresh connection with `Connection: close` and reads
/// until the server closes it. Only `http://` URLs are supported.
#[derive(Debug, Clone, Default)]
pub struct TcpTransport {
    timeout: TimeoutConfig,
}

impl TcpTransport {
    pub fn new(timeout: TimeoutConfig) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Transport for TcpTransport {
    async fn send(&self, request: HttpRequest) -> Result<Response, FetchError> {
        let url = request.full_url();
        let uri: Uri = url
            .parse()
            .map_err(|e| FetchError::transport(format!("invalid URL {}: {}", url, e)))?;

        match uri.scheme_str() {
            Some("http") => {}
            other => {
                return Err(FetchError::transport(format!(
                    "unsupported scheme {:?} in {}",
                    other.unwrap_or(""),
                    url
                )))
            }
        }

        let host = uri
            .host()
            .ok_or_else(|| FetchError::transport(format!("missing host in {}", url)))?;
        let port = uri.port_u16().unwrap_or(80);
        let authority = uri.authority().map(|a| a.as_str()).unwrap_or(host);
        let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");

        let mut stream = tokio::time::timeout(self.timeout.connect, TcpStream::connect((host, port)))
            .await
            .map_err(|_| FetchError::timeout(self.timeout.connect))?
            .map_err(|e| FetchError::connect(format!("{}:{}: {}", host, port, e)))?;

        let mut head = format!("GET {} HTTP/1.0\r\nHost: {}\r\n", path, authority);
        for (key, value) in request.headers() {
            head.push_str(&format!("{}: {}\r\n", key, value));
        }
        head.push_str("Connection: close\r\n\r\n");

        trace!(%url, "sending request");
        stream
            .write_all(head.as_bytes())
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;
        stream
            .flush()
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        let mut buf = Vec::new();
        stream
            .read_to_end(&mut buf)
            .await
            .map_err(|e| FetchError::transport(e.to_string()))?;

        parse_response(&buf)
    }
}

/// Parse a complete HTTP/1.x response read to EOF.
pub fn parse_response(raw: &[u8]) -> Result<Response, FetchError> {
    let split = find(raw, b"\r\n\r\n")
        .ok_or_else(|| FetchError::transport("response ended before headers were complete"))?;
    let head = String::from_utf8_lossy(&raw[..split]);
    let body = &raw[split + 4..];

    let mut lines = head.split("\r\n");
    let status_line = lines.next().unwrap_or("");
    let mut parts = status_line.split_whitespace();
    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(FetchError::transport(format!("bad status line {:?}", status_line)));
    }
    let status: u16 = parts
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| FetchError::transport(format!("bad status line {:?}", status_line)))?;

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();

    let response = Response::new(status, headers, Vec::new());
    let chunked = response
        .header("Transfer-Encoding")
        .is_some_and(|v| v.eq_ignore_ascii_case("chunked"));
    let body = if chunked {
        decode_chunked(body)?
    } else {
        body.to_vec()
    };

    Ok(Response { body, ..response })
}

fn decode_chunked(mut data: &[u8]) -> Result<Vec<u8>, FetchError> {
    let mut out = Vec::new();
    loop {
        let line_end = find(data, b"\r\n")
            .ok_or_else(|| FetchError::transport("truncated chunk header"))?;
        let size_line = String::from_utf8_lossy(&data[..line_end]);
        let size_hex = size_line.split(';').next().unwrap_or("").trim();
        let size = usize::from_str_radix(size_hex, 16)
            .map_err(|_| FetchError::transport(format!("bad chunk size {:?}", size_hex)))?;
        data = &data[line_end + 2..];

        if size == 0 {
            return Ok(out);
        }
        if data.len() < size {
            return Err(FetchError::transport("truncated chunk"));
        }
        out.extend_from_slice(&data[..size]);
        data = data.get(size + 2..).unwrap_or(&[]);
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
