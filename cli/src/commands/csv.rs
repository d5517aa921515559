//! `csv2enum` implementation
//!
//! Streams rows from a CSV file and prints one constant per line.

use std::io::Write;
use std::path::PathBuf;

use enumgen::Transform;

use crate::commands::{RowFormatter, RunStats};
use crate::config::InvalidPolicy;
use crate::error::CliError;
use crate::output::{Emitter, LineStyle, OutputEncoding};
use crate::source::CsvSource;
use crate::source::csv::DEFAULT_DELIMITER;

#[derive(Debug, Clone)]
pub struct CsvOptions {
    pub path: PathBuf,
    pub delimiter: u8,
    pub transform: Transform,
    pub on_invalid: InvalidPolicy,
    pub encoding: OutputEncoding,
}

impl CsvOptions {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: DEFAULT_DELIMITER,
            transform: Transform::default(),
            on_invalid: InvalidPolicy::default(),
            encoding: OutputEncoding::default(),
        }
    }
}

/// Run the csv command, writing lines to `writer`.
///
/// Rows before a failing one have already been written when an error is
/// returned.
pub fn run<W: Write>(options: &CsvOptions, writer: W) -> Result<RunStats, CliError> {
    let source = CsvSource::open_with_delimiter(&options.path, options.delimiter)?;
    let mut formatter = RowFormatter::new(&options.transform, options.on_invalid);
    let mut emitter = Emitter::new(writer, LineStyle::Listing, options.encoding);

    for (index, row) in source.enumerate() {
        if let Some(line) = formatter.format(index + 1, &row?)? {
            emitter.emit(&line)?;
        }
    }

    let stats = RunStats {
        written: emitter.lines(),
        skipped: formatter.skipped(),
    };
    emitter.finish()?;

    tracing::info!(
        path = %options.path.display(),
        written = stats.written,
        skipped = stats.skipped,
        "csv converted"
    );
    Ok(stats)
}
