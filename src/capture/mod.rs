//! Bounded tee capture
//!
//! Wraps the inbound body reader used by the real request handler, mirroring
//! a bounded prefix of everything the handler reads. The handler sees the
//! original content, chunking, and errors untouched; once the cap is hit the
//! mirror stops silently while a running total keeps counting.

use std::io::{self, Read};

use chrono::Utc;

use crate::error::Result;
use crate::models::{HttpRequestHeader, HttpRequestMethod, HttpRequestPayload, HttpRequestRecord};

/// Maximum number of payload bytes recorded per request, unless overridden
pub const DEFAULT_MAX_RECORDABLE_PAYLOAD_BYTE_COUNT: usize = 10 * 1024 * 1024;

/// A pass-through reader that mirrors up to `cap` bytes of what its caller
/// reads. Capture is synchronous and inline: no background work, no extra
/// buffering beyond the bounded mirror.
#[derive(Debug)]
pub struct TeeReader<R> {
    inner: R,
    captured: Vec<u8>,
    cap: usize,
    total_byte_count: u64,
}

impl<R: Read> TeeReader<R> {
    /// Wrap a reader with the default 10 MiB cap
    pub fn new(inner: R) -> Self {
        Self::with_cap(inner, DEFAULT_MAX_RECORDABLE_PAYLOAD_BYTE_COUNT)
    }

    /// Wrap a reader, mirroring at most `cap` bytes
    pub fn with_cap(inner: R, cap: usize) -> Self {
        Self {
            inner,
            captured: Vec::new(),
            cap,
            total_byte_count: 0,
        }
    }

    /// Total bytes delivered to the caller so far, capped or not
    pub fn total_byte_count(&self) -> u64 {
        self.total_byte_count
    }

    /// The mirrored prefix accumulated so far
    pub fn captured_bytes(&self) -> &[u8] {
        &self.captured
    }

    /// Consume the tee and produce the payload for record finalization
    pub fn into_payload(self) -> Result<HttpRequestPayload> {
        HttpRequestPayload::new(self.captured, self.total_byte_count)
    }

    /// Consume the tee, returning the wrapped reader and the payload
    pub fn into_parts(self) -> Result<(R, HttpRequestPayload)> {
        let payload = HttpRequestPayload::new(self.captured, self.total_byte_count)?;
        Ok((self.inner, payload))
    }
}

impl<R: Read> Read for TeeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.total_byte_count += n as u64;
        let room = self.cap - self.captured.len();
        if room > 0 {
            let take = room.min(n);
            self.captured.extend_from_slice(&buf[..take]);
        }
        Ok(n)
    }
}

/// Request metadata the host supplies per exchange, alongside the byte source
#[derive(Debug, Clone)]
pub struct ExchangeMetadata {
    pub method: HttpRequestMethod,
    pub uri: String,
    pub headers: Vec<HttpRequestHeader>,
}

/// Join a request path and query string into the recorded URI form.
/// A blank query string is treated as absent.
pub fn request_uri(path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.trim().is_empty() => format!("{path}?{q}"),
        _ => path.to_string(),
    }
}

/// Derive the record group name from a recorded URI: drop the query string,
/// drop the leading slash, turn the remaining slashes into dots.
pub fn group_name(uri: &str) -> String {
    let path = uri.split('?').next().unwrap_or(uri);
    path.trim_start_matches('/').replace('/', ".")
}

/// Finalize a record once the real handler has completed.
///
/// Called with the id assigned by the generator, the host-supplied metadata,
/// and the payload extracted from the tee. The record is built in a single
/// step; timestamp is taken here, at finalization.
pub fn build_record(
    id: String,
    metadata: ExchangeMetadata,
    payload: HttpRequestPayload,
) -> HttpRequestRecord {
    HttpRequestRecord {
        id,
        timestamp: Utc::now().timestamp_millis(),
        group_name: group_name(&metadata.uri),
        uri: metadata.uri,
        method: metadata.method,
        headers: metadata.headers,
        payload,
    }
}
