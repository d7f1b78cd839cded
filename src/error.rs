//! Error types shared across the crate

use std::io;
use thiserror::Error;

/// Errors raised while capturing, encoding, reading, or replaying records
#[derive(Error, Debug)]
pub enum HrrsError {
    /// I/O failure from an underlying byte source or sink, propagated verbatim
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A wire line without a field separator; fatal to the current pass
    #[error("could not locate the field separator (line_index={line_index})")]
    MissingFieldSeparator { line_index: u64 },

    /// A wire line whose base64 payload does not decode
    #[error("could not decode the base64 payload (line_index={line_index}): {source}")]
    MalformedPayload {
        line_index: u64,
        source: base64::DecodeError,
    },

    /// A wire line whose binary record body does not decode
    #[error("could not decode the record (line_index={line_index}): {source}")]
    MalformedRecord {
        line_index: u64,
        source: rmp_serde::decode::Error,
    },

    /// Record serialization failure on the write path
    #[error("could not serialize the record: {0}")]
    Serialize(#[from] rmp_serde::encode::Error),

    /// An HTTP verb outside the supported enumeration
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),

    /// Payload construction with fewer observed bytes than captured bytes
    #[error("total byte count {total} is less than captured byte count {captured}")]
    InvalidPayload { total: u64, captured: u64 },

    /// `next_record()` called without a prior successful `has_next()`
    #[error("next_record() called before has_next() confirmed availability")]
    AvailabilityNotChecked,
}

/// Result type for record operations
pub type Result<T> = std::result::Result<T, HrrsError>;
