//! Record persistence
//!
//! The capture side hands finalized records to a sink that appends one
//! record at a time and flushes at shutdown. The file sink writes the wire
//! format of [`crate::codec`], one line per record, opened in append mode so
//! a restarted process extends the same file.

use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use tracing::trace;

use crate::codec::RecordWriter;
use crate::error::Result;
use crate::models::HttpRequestRecord;

/// Destination for finalized records
pub trait RecordSink {
    /// Append one record
    fn append(&mut self, record: &HttpRequestRecord) -> Result<()>;

    /// Flush buffered records to durable storage
    fn flush(&mut self) -> Result<()>;
}

/// A sink appending wire lines to a file
#[derive(Debug)]
pub struct FileRecordSink {
    path: PathBuf,
    writer: RecordWriter<BufWriter<File>>,
}

impl FileRecordSink {
    /// Open (or create) the file at `path` for appending
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        trace!(path = %path.display(), "opened record sink");
        Ok(Self {
            path,
            writer: RecordWriter::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSink for FileRecordSink {
    fn append(&mut self, record: &HttpRequestRecord) -> Result<()> {
        self.writer.write(record)
    }

    fn flush(&mut self) -> Result<()> {
        trace!(path = %self.path.display(), "flushing record sink");
        self.writer.flush()
    }
}
