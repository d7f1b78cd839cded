//! HTTP request record model
//!
//! Represents a single HTTP exchange captured at the interception point.

use serde::{Deserialize, Serialize};

use crate::error::{HrrsError, Result};

/// HTTP methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpRequestMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
}

impl HttpRequestMethod {
    /// Convert to the wire-form verb
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpRequestMethod::Get => "GET",
            HttpRequestMethod::Post => "POST",
            HttpRequestMethod::Put => "PUT",
            HttpRequestMethod::Patch => "PATCH",
            HttpRequestMethod::Delete => "DELETE",
            HttpRequestMethod::Head => "HEAD",
            HttpRequestMethod::Options => "OPTIONS",
            HttpRequestMethod::Connect => "CONNECT",
            HttpRequestMethod::Trace => "TRACE",
        }
    }
}

impl std::str::FromStr for HttpRequestMethod {
    type Err = HrrsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpRequestMethod::Get),
            "POST" => Ok(HttpRequestMethod::Post),
            "PUT" => Ok(HttpRequestMethod::Put),
            "PATCH" => Ok(HttpRequestMethod::Patch),
            "DELETE" => Ok(HttpRequestMethod::Delete),
            "HEAD" => Ok(HttpRequestMethod::Head),
            "OPTIONS" => Ok(HttpRequestMethod::Options),
            "CONNECT" => Ok(HttpRequestMethod::Connect),
            "TRACE" => Ok(HttpRequestMethod::Trace),
            _ => Err(HrrsError::UnknownMethod(s.to_string())),
        }
    }
}

impl std::fmt::Display for HttpRequestMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request header; arrival order and duplicates are preserved by
/// keeping headers in a `Vec`, not a map
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestHeader {
    pub name: String,
    pub value: String,
}

impl HttpRequestHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// The captured request body prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestPayload {
    /// Bytes observed but not captured because the recording cap was hit
    pub missing_byte_count: u64,
    /// The captured prefix, at most the configured cap
    pub bytes: Vec<u8>,
}

impl HttpRequestPayload {
    /// Build a payload from the captured prefix and the total number of
    /// bytes the exchange actually carried. Fails if the total is smaller
    /// than the captured prefix.
    pub fn new(bytes: Vec<u8>, total_byte_count: u64) -> Result<Self> {
        let captured = bytes.len() as u64;
        if total_byte_count < captured {
            return Err(HrrsError::InvalidPayload {
                total: total_byte_count,
                captured,
            });
        }
        Ok(Self {
            missing_byte_count: total_byte_count - captured,
            bytes,
        })
    }

    /// Total number of bytes the exchange carried, captured or not
    pub fn total_byte_count(&self) -> u64 {
        self.bytes.len() as u64 + self.missing_byte_count
    }
}

/// One captured HTTP exchange
///
/// Constructed exactly once, after the intercepted exchange's real handler
/// has finished; immutable afterward. Records are self-contained: nothing in
/// one record refers to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpRequestRecord {
    /// Opaque generator-assigned identifier
    pub id: String,

    /// Capture time, milliseconds since epoch
    pub timestamp: i64,

    /// Group name derived from the request path, used to bucket requests
    /// during replay reporting
    pub group_name: String,

    /// Request path including the query string
    pub uri: String,

    /// HTTP method
    pub method: HttpRequestMethod,

    /// Request headers in arrival order
    pub headers: Vec<HttpRequestHeader>,

    /// Captured body prefix plus the missing-byte count
    pub payload: HttpRequestPayload,
}
