//! Record wire codec
//!
//! One record per line: `<id><TAB><base64 body><LF>`. The body is the
//! MessagePack serialization of the record, base64-wrapped so the whole line
//! stays in the printable ASCII range. The field set and encoding order are a
//! contract shared by capture and replay; there is no version marker today,
//! so any change to the record's fields must introduce one first.

use std::io::Write;

use base64::{engine::general_purpose, Engine as _};

use crate::error::{HrrsError, Result};
use crate::models::HttpRequestRecord;

/// Separates the id prefix from the base64 body within a line
pub const FIELD_SEPARATOR: char = '\t';

/// Terminates each encoded record
pub const RECORD_SEPARATOR: char = '\n';

/// Encode a record into its wire line, including the trailing separator
pub fn encode(record: &HttpRequestRecord) -> Result<String> {
    let body = rmp_serde::to_vec(record)?;
    let encoded = general_purpose::STANDARD.encode(body);
    Ok(format!(
        "{}{}{}{}",
        record.id, FIELD_SEPARATOR, encoded, RECORD_SEPARATOR
    ))
}

/// Decode one wire line. `line_index` is the 0-based position of the line in
/// its source and is carried on every failure.
///
/// The field separator is located with its **last** occurrence: the base64
/// alphabet cannot contain a tab, so an id that does still splits correctly.
pub fn decode(line: &str, line_index: u64) -> Result<HttpRequestRecord> {
    let separator_index = line
        .rfind(FIELD_SEPARATOR)
        .ok_or(HrrsError::MissingFieldSeparator { line_index })?;
    let encoded = &line[separator_index + FIELD_SEPARATOR.len_utf8()..];
    let body = general_purpose::STANDARD
        .decode(encoded.trim_end_matches(RECORD_SEPARATOR))
        .map_err(|source| HrrsError::MalformedPayload { line_index, source })?;
    rmp_serde::from_slice(&body).map_err(|source| HrrsError::MalformedRecord { line_index, source })
}

/// Writes encoded records to any byte sink
#[derive(Debug)]
pub struct RecordWriter<W> {
    target: W,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(target: W) -> Self {
        Self { target }
    }

    /// Append one record as a single wire line
    pub fn write(&mut self, record: &HttpRequestRecord) -> Result<()> {
        let line = encode(record)?;
        self.target.write_all(line.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.target.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        HttpRequestHeader, HttpRequestMethod, HttpRequestPayload, HttpRequestRecord,
    };

    fn sample_record(id: &str) -> HttpRequestRecord {
        HttpRequestRecord {
            id: id.to_string(),
            timestamp: 1_700_000_000_000,
            group_name: "api.orders".to_string(),
            uri: "/api/orders?page=2".to_string(),
            method: HttpRequestMethod::Post,
            headers: vec![
                HttpRequestHeader::new("accept", "application/json"),
                HttpRequestHeader::new("x-trace", "a"),
                HttpRequestHeader::new("x-trace", "b"),
            ],
            payload: HttpRequestPayload::new(b"hello".to_vec(), 12).expect("payload"),
        }
    }

    #[test]
    fn encode_then_decode_reproduces_the_record() {
        let record = sample_record("rec-1");
        let line = encode(&record).expect("encodes");
        let decoded = decode(&line, 0).expect("decodes");
        assert_eq!(decoded, record);
    }

    #[test]
    fn encoded_line_is_printable_ascii_plus_separators() {
        let record = sample_record("rec-2");
        let line = encode(&record).expect("encodes");
        assert!(line.ends_with(RECORD_SEPARATOR));
        let trimmed = &line[..line.len() - 1];
        assert_eq!(trimmed.matches(FIELD_SEPARATOR).count(), 1);
        assert!(trimmed
            .chars()
            .all(|c| c == FIELD_SEPARATOR || (' '..='~').contains(&c)));
    }

    #[test]
    fn decode_splits_on_the_last_separator() {
        // An id containing the separator must not confuse the split.
        let record = sample_record("odd\tid");
        let line = encode(&record).expect("encodes");
        let decoded = decode(&line, 3).expect("decodes");
        assert_eq!(decoded.id, "odd\tid");
        assert_eq!(decoded, record);
    }

    #[test]
    fn missing_separator_reports_line_index() {
        let err = decode("no separator here", 41).unwrap_err();
        assert!(matches!(
            err,
            HrrsError::MissingFieldSeparator { line_index: 41 }
        ));
    }

    #[test]
    fn garbage_base64_reports_line_index() {
        let err = decode("rec-1\t!!!not base64!!!", 7).unwrap_err();
        assert!(matches!(
            err,
            HrrsError::MalformedPayload { line_index: 7, .. }
        ));
    }

    #[test]
    fn valid_base64_of_garbage_reports_line_index() {
        let encoded = general_purpose::STANDARD.encode(b"not a record");
        let line = format!("rec-1\t{encoded}");
        let err = decode(&line, 9).unwrap_err();
        assert!(matches!(
            err,
            HrrsError::MalformedRecord { line_index: 9, .. }
        ));
    }

    #[test]
    fn writer_emits_one_line_per_record() {
        let mut writer = RecordWriter::new(Vec::new());
        writer.write(&sample_record("a")).expect("write a");
        writer.write(&sample_record("b")).expect("write b");
        writer.flush().expect("flush");

        let written = String::from_utf8(writer.into_inner()).expect("utf8");
        assert_eq!(written.lines().count(), 2);
        assert!(written.lines().all(|l| l.contains(FIELD_SEPARATOR)));
    }
}
