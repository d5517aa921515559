//! CSV row source
//!
//! Rows stream lazily from a delimited file with no header row. Invalid UTF-8
//! byte sequences are dropped from each field.
//!
//! Every line becomes a row, blank ones included: a blank line before the
//! last record yields a row with an empty name, so the invalid-name policy sees
//! it. Blank lines after the last record are ignored.

use std::fs::File;
use std::io::{Chain, Read};
use std::path::Path;

use csv::{ByteRecord, Reader, ReaderBuilder, Terminator};
use enumgen::Row;

use crate::error::CliError;

pub const DEFAULT_DELIMITER: u8 = b';';

/// Iterator over the rows of a CSV file
pub struct CsvSource<R: Read = File> {
    // A trailing `\n` is chained on so the last record is always terminated.
    reader: Reader<Chain<R, &'static [u8]>>,
    record: ByteRecord,
    /// Line the reader stopped at after the previous record
    line: u64,
    /// Blank lines still to be reported before `pending`
    blank: u64,
    pending: Option<Row>,
}

impl CsvSource<File> {
    /// Open `path` with the default `;` delimiter
    pub fn open(path: &Path) -> Result<Self, CliError> {
        Self::open_with_delimiter(path, DEFAULT_DELIMITER)
    }

    pub fn open_with_delimiter(path: &Path, delimiter: u8) -> Result<Self, CliError> {
        let file = File::open(path)
            .map_err(|e| CliError::IoError(format!("Failed to open {}: {}", path.display(), e)))?;
        Ok(Self::from_reader(file, delimiter))
    }
}

impl<R: Read> CsvSource<R> {
    pub fn from_reader(reader: R, delimiter: u8) -> Self {
        // Only `\n` ends a record; a `\r` before it is trimmed from the last
        // field, which keeps one `\n` per line for the blank-line count.
        let reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .from_reader(reader.chain(&b"\n"[..]));
        Self {
            reader,
            record: ByteRecord::new(),
            line: 1,
            blank: 0,
            pending: None,
        }
    }
}

impl<R: Read> Iterator for CsvSource<R> {
    type Item = Result<Row, CliError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.blank > 0 {
            self.blank -= 1;
            return Some(Ok(Row::default()));
        }
        if let Some(row) = self.pending.take() {
            return Some(Ok(row));
        }

        match self.reader.read_byte_record(&mut self.record) {
            Ok(false) => None,
            Ok(true) => {
                let end = self.reader.position().line();
                // Newlines consumed: skipped blank lines, newlines inside
                // quoted fields, and the terminator.
                let inner = newlines_in(&self.record);
                let blank = (end - self.line).saturating_sub(inner + 1);
                self.line = end;

                let row = decode_record(&self.record);
                if blank == 0 {
                    return Some(Ok(row));
                }
                tracing::debug!(line = end - inner - 1, blank, "blank lines before record");
                self.blank = blank - 1;
                self.pending = Some(row);
                Some(Ok(Row::default()))
            }
            Err(e) => Some(Err(CliError::CsvError(e.to_string()))),
        }
    }
}

fn newlines_in(record: &ByteRecord) -> u64 {
    record
        .iter()
        .map(|field| field.iter().filter(|&&b| b == b'\n').count() as u64)
        .sum()
}

fn decode_record(record: &ByteRecord) -> Row {
    let last = record.len().saturating_sub(1);
    Row::new(record.iter().enumerate().map(|(i, field)| {
        let field = if i == last {
            field.strip_suffix(b"\r").unwrap_or(field)
        } else {
            field
        };
        decode_dropping_invalid(field)
    }))
}

/// Decode UTF-8, silently dropping invalid byte sequences.
pub fn decode_dropping_invalid(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}
