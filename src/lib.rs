//! # HRRS
//!
//! Records live HTTP exchanges observed at a server-side interception point,
//! serializes them into a durable line-oriented format, and replays a
//! bounded-memory, resumable stream of those records.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌────────┐   ┌────────┐   ┌──────────┐
//! │   Tee    │──▶│  Record   │──▶│ Codec  │──▶│ Reader │──▶│  Replay  │
//! │ Capture  │   │   Model   │   │ (b64)  │   │ (lazy) │   │   Loop   │
//! └──────────┘   └───────────┘   └────────┘   └────────┘   └──────────┘
//! ```
//!
//! Capture wraps the handler's body reader ([`capture::TeeReader`]),
//! mirroring at most a configured cap (10 MiB by default) while the handler
//! sees the original stream untouched. After the handler completes, the host
//! finalizes an immutable [`models::HttpRequestRecord`] and appends it to a
//! [`storage::RecordSink`]. Replay resolves a [`replay::RecordSource`] into
//! a fresh byte source per pass and feeds decoded records to a consumer for
//! as long as a caller-supplied predicate holds.
//!
//! Host integration (middleware wiring), file transport between hosts, and
//! reporting stay outside this crate; it never mutates request semantics and
//! never validates that captured bytes form well-formed HTTP.

pub mod capture;
pub mod codec;
pub mod error;
pub mod models;
pub mod reader;
pub mod replay;
pub mod storage;

pub use capture::{TeeReader, DEFAULT_MAX_RECORDABLE_PAYLOAD_BYTE_COUNT};
pub use error::{HrrsError, Result};
pub use models::{
    HrrsIdGenerator, HttpRequestHeader, HttpRequestMethod, HttpRequestPayload, HttpRequestRecord,
};
pub use reader::RecordReader;
pub use replay::{consume_while, FileRecordSource, RecordSource};
pub use storage::{FileRecordSink, RecordSink};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
