//! Lazy record reader
//!
//! A forward-only, single-pass sequence of decoded records over a
//! line-oriented source. Availability is checked explicitly: `has_next`
//! buffers exactly one line, `next_record` decodes and clears it. A
//! malformed line is fatal; the reader never skips ahead to resynchronize.

use std::io::BufRead;

use crate::codec;
use crate::error::{HrrsError, Result};
use crate::models::HttpRequestRecord;

/// Reads decoded records one line at a time.
///
/// Exactly one consumer may iterate a reader; the `records()` adapter takes
/// the reader by value to enforce this.
#[derive(Debug)]
pub struct RecordReader<R> {
    source: R,
    buffered_line: Option<String>,
    next_line_index: u64,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(source: R) -> Self {
        Self {
            source,
            buffered_line: None,
            next_line_index: 0,
        }
    }

    /// Check whether another record is available, reading and buffering at
    /// most one line. Idempotent while a line is buffered.
    pub fn has_next(&mut self) -> Result<bool> {
        if self.buffered_line.is_some() {
            return Ok(true);
        }
        let mut line = String::new();
        let read = self.source.read_line(&mut line)?;
        if read == 0 {
            return Ok(false);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        self.buffered_line = Some(line);
        Ok(true)
    }

    /// Decode the buffered line and clear the buffer.
    ///
    /// Calling this without a prior successful `has_next` is a programming
    /// error and fails with [`HrrsError::AvailabilityNotChecked`].
    pub fn next_record(&mut self) -> Result<HttpRequestRecord> {
        let line = self
            .buffered_line
            .take()
            .ok_or(HrrsError::AvailabilityNotChecked)?;
        let line_index = self.next_line_index;
        self.next_line_index += 1;
        codec::decode(&line, line_index)
    }

    /// Consume the reader, yielding records as a standard iterator
    pub fn records(self) -> Records<R> {
        Records { reader: self }
    }
}

/// Iterator adapter over a [`RecordReader`]
#[derive(Debug)]
pub struct Records<R> {
    reader: RecordReader<R>,
}

impl<R: BufRead> Iterator for Records<R> {
    type Item = Result<HttpRequestRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.reader.has_next() {
            Ok(true) => Some(self.reader.next_record()),
            Ok(false) => None,
            Err(error) => Some(Err(error)),
        }
    }
}
