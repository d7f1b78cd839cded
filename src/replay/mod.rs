//! Resumable record replay
//!
//! Drives a consumer over one or more passes of a record source. The
//! continuation predicate alone decides termination: when a pass ends by
//! exhaustion and the predicate still holds, the source is re-resolved and a
//! new pass begins, which supports files that are rotated, appended to, or
//! regenerated between passes. The byte source of each pass is released on
//! every exit path before the loop repeats or returns.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::Result;
use crate::models::HttpRequestRecord;
use crate::reader::RecordReader;

/// Resolves an input location into a fresh openable byte source, once per
/// pass
pub trait RecordSource {
    type Reader: BufRead;

    fn open(&self) -> Result<Self::Reader>;
}

/// A record source backed by a file path, reopened for every pass
#[derive(Debug, Clone)]
pub struct FileRecordSource {
    path: PathBuf,
}

impl FileRecordSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for FileRecordSource {
    type Reader = BufReader<File>;

    fn open(&self) -> Result<Self::Reader> {
        trace!(path = %self.path.display(), "opening record file");
        Ok(BufReader::new(File::open(&self.path)?))
    }
}

impl<F, R> RecordSource for F
where
    F: Fn() -> Result<R>,
    R: BufRead,
{
    type Reader = R;

    fn open(&self) -> Result<Self::Reader> {
        self()
    }
}

/// Consume records from `source` while `predicate` holds, re-resolving the
/// source for a new pass whenever a pass ends by exhaustion with the
/// predicate still true.
///
/// The predicate is re-evaluated before every record and before every pass;
/// a false return stops the loop cooperatively. With an always-false
/// predicate the source is never opened. Any error from open, read, decode,
/// or the consumer aborts the current pass — its byte source is dropped
/// first — and propagates to the caller; there is no retry and no
/// line-skipping recovery.
pub fn consume_while<S, P, C>(source: &S, mut predicate: P, mut consumer: C) -> Result<()>
where
    S: RecordSource,
    P: FnMut() -> bool,
    C: FnMut(HttpRequestRecord) -> Result<()>,
{
    let mut pass: u64 = 0;
    loop {
        if !predicate() {
            debug!(pass, "replay stopped by predicate");
            return Ok(());
        }
        debug!(pass, "starting replay pass");
        let mut reader = RecordReader::new(source.open()?);
        let resuming = loop {
            if !predicate() {
                break false;
            }
            if !reader.has_next()? {
                break true;
            }
            let record = reader.next_record()?;
            consumer(record)?;
        };
        // The pass's byte source is dropped here, before any reopen.
        drop(reader);
        if !resuming {
            debug!(pass, "replay stopped by predicate");
            return Ok(());
        }
        pass += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::error::HrrsError;
    use crate::models::{
        HttpRequestHeader, HttpRequestMethod, HttpRequestPayload, HttpRequestRecord,
    };
    use std::cell::Cell;
    use std::io::Cursor;

    fn sample_record(id: &str) -> HttpRequestRecord {
        HttpRequestRecord {
            id: id.to_string(),
            timestamp: 1_700_000_000_000,
            group_name: "hello".to_string(),
            uri: "/hello".to_string(),
            method: HttpRequestMethod::Get,
            headers: vec![HttpRequestHeader::new("host", "localhost")],
            payload: HttpRequestPayload::new(Vec::new(), 0).expect("payload"),
        }
    }

    fn encoded_lines(ids: &[&str]) -> String {
        ids.iter()
            .map(|id| encode(&sample_record(id)).expect("encodes"))
            .collect()
    }

    #[test]
    fn always_false_predicate_never_opens_the_source() {
        let opens = Cell::new(0u32);
        let source = || {
            opens.set(opens.get() + 1);
            Ok(Cursor::new(encoded_lines(&["a"])))
        };

        let mut consumed = 0;
        consume_while(&source, || false, |_| {
            consumed += 1;
            Ok(())
        })
        .expect("loop ok");

        assert_eq!(consumed, 0);
        assert_eq!(opens.get(), 0);
    }

    #[test]
    fn predicate_true_until_exhaustion_runs_exactly_one_pass() {
        let opens = Cell::new(0u32);
        let source = || {
            opens.set(opens.get() + 1);
            Ok(Cursor::new(encoded_lines(&["a", "b"])))
        };

        let mut ids = Vec::new();
        let exhausted = Cell::new(false);
        consume_while(
            &source,
            || !exhausted.get(),
            |record| {
                if record.id == "b" {
                    exhausted.set(true);
                }
                ids.push(record.id);
                Ok(())
            },
        )
        .expect("loop ok");

        assert_eq!(ids, ["a", "b"]);
        assert_eq!(opens.get(), 1);
    }

    #[test]
    fn predicate_surviving_exhaustion_reopens_the_source() {
        let opens = Cell::new(0u32);
        let source = || {
            opens.set(opens.get() + 1);
            Ok(Cursor::new(encoded_lines(&["a"])))
        };

        // Stay true across the first exhaustion, stop during the second pass.
        let checks = Cell::new(0u32);
        let mut ids = Vec::new();
        consume_while(
            &source,
            || {
                checks.set(checks.get() + 1);
                checks.get() <= 4
            },
            |record| {
                ids.push(record.id);
                Ok(())
            },
        )
        .expect("loop ok");

        assert_eq!(opens.get(), 2);
        assert_eq!(ids, ["a", "a"]);
    }

    #[test]
    fn consumer_error_aborts_the_pass() {
        let source = || Ok(Cursor::new(encoded_lines(&["a", "b"])));

        let mut seen = 0;
        let result = consume_while(&source, || true, |_| {
            seen += 1;
            Err(HrrsError::AvailabilityNotChecked)
        });

        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn decode_error_propagates_with_line_index() {
        let source = || {
            let mut input = encoded_lines(&["good"]);
            input.push_str("broken line without separator\n");
            Ok(Cursor::new(input))
        };

        let mut ids = Vec::new();
        let err = consume_while(&source, || true, |record| {
            ids.push(record.id);
            Ok(())
        })
        .unwrap_err();

        assert_eq!(ids, ["good"]);
        assert!(matches!(
            err,
            HrrsError::MissingFieldSeparator { line_index: 1 }
        ));
    }

    #[test]
    fn open_error_propagates() {
        let source = || -> Result<Cursor<String>> {
            Err(HrrsError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "rotated away",
            )))
        };
        let err = consume_while(&source, || true, |_| Ok(())).unwrap_err();
        assert!(matches!(err, HrrsError::Io(_)));
    }
}
