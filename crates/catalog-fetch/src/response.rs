//! HTTP response handling.

use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::error::FetchError;

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    /// The HTTP status code.
    pub status: u16,
    /// The response headers.
    pub headers: HashMap<String, String>,
    /// The response body.
    pub body: Vec<u8>,
}

impl Response {
    /// Create a new response.
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if the response was successful (2xx status).
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get the response body as text.
    pub fn text(&self) -> Result<String, FetchError> {
        String::from_utf8(self.body.clone())
            .map_err(|e| FetchError::malformed(format!("invalid UTF-8: {}", e)))
    }

    /// Parse the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(|e| FetchError::malformed(e.to_string()))
    }

    /// Get the raw response body.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Get a header value (case-insensitive).
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// Get the Content-Type header.
    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    /// Convert to a Result, returning a network error for non-2xx status codes.
    pub fn error_for_status(self) -> Result<Self, FetchError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(FetchError::status(self.status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::NetworkFailure;

    fn make_response(status: u16, body: &[u8]) -> Response {
        Response::new(status, HashMap::new(), body.to_vec())
    }

    #[test]
    fn test_response_is_success() {
        assert!(make_response(200, b"").is_success());
        assert!(make_response(204, b"").is_success());
        assert!(!make_response(301, b"").is_success());
        assert!(!make_response(404, b"").is_success());
    }

    #[test]
    fn test_response_json() {
        use serde::Deserialize;

        #[derive(Deserialize, Debug, PartialEq)]
        struct Data {
            count: u64,
        }

        let resp = make_response(200, br#"{"count": 137}"#);
        assert_eq!(resp.json::<Data>().unwrap(), Data { count: 137 });
    }

    #[test]
    fn test_response_json_invalid_is_malformed() {
        let resp = make_response(200, b"<html>");
        let err = resp.json::<serde_json::Value>().unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn test_response_text_invalid_utf8() {
        assert!(make_response(200, &[0xff, 0xfe]).text().is_err());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("Content-Type".to_string(), "application/json".to_string());
        let resp = Response::new(200, headers, Vec::new());

        assert_eq!(resp.header("content-type"), Some("application/json"));
        assert_eq!(resp.content_type(), Some("application/json"));
        assert_eq!(resp.header("X-Missing"), None);
    }

    #[test]
    fn test_error_for_status() {
        assert!(make_response(200, b"OK").error_for_status().is_ok());

        let err = make_response(503, b"busy").error_for_status().unwrap_err();
        assert_eq!(err, FetchError::Network(NetworkFailure::Status(503)));
    }
}
