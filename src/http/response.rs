//! Response and API error types

use super::link;
use bytes::Bytes;
use reqwest::header::{HeaderMap, LOCATION};
use std::fmt;

/// A successful (status < 400) response, owned by the caller that issued it
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Response {
    pub fn new(status: u16, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
    }

    /// Cursor for the following page, taken from the `Link` header
    pub fn next_link(&self) -> Option<String> {
        link::next_link(&self.headers)
    }
}

/// Non-2xx response. The body is kept raw; it is only turned into text
/// when the error is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: u16,
    pub body: Bytes,
}

impl ApiError {
    pub fn new(status: u16, body: Bytes) -> Self {
        Self { status, body }
    }

    /// Trimmed response body as text
    pub fn message(&self) -> String {
        String::from_utf8_lossy(&self.body).trim().to_string()
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message();
        if message.is_empty() {
            write!(f, "api error: status {}", self.status)
        } else {
            write!(f, "api error: status {}: {}", self.status, message)
        }
    }
}

impl std::error::Error for ApiError {}
