//! Output handling: line joining, output encoding, and status message styling.

use std::io::Write;

use colored::Colorize;
use encoding_rs::{EncoderResult, Encoding, UTF_8};

use crate::error::CliError;

// ============================================================================
// Status messages (stderr)
// ============================================================================

pub fn warning(text: &str) -> String {
    format!("{}", text.yellow())
}

pub fn muted(text: &str) -> String {
    format!("{}", text.bright_black())
}

pub fn err_line(text: &str) -> String {
    format!("{} {}", "Error:".red().bold(), text)
}

// ============================================================================
// Line joining
// ============================================================================

/// How generated lines are joined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// One line per row, each ending in a newline
    Listing,
    /// Lines separated by `,\n`, the whole output terminated by `;`
    Statement,
}

// ============================================================================
// Encoding
// ============================================================================

/// Target encoding for generated text
#[derive(Debug, Clone, Copy)]
pub struct OutputEncoding {
    encoding: &'static Encoding,
    lossy_output: bool,
}

impl Default for OutputEncoding {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            lossy_output: false,
        }
    }
}

impl OutputEncoding {
    /// Look up an encoding by its WHATWG label (`utf-8`, `windows-1251`, ...)
    pub fn from_label(label: &str, lossy_output: bool) -> Result<Self, CliError> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| CliError::UnknownEncoding(label.to_owned()))?;
        Ok(Self {
            encoding: encoding.output_encoding(),
            lossy_output,
        })
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encode `text`; unencodable characters are dropped when lossy,
    /// otherwise the first one is an error.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>, CliError> {
        if self.encoding == UTF_8 {
            return Ok(text.as_bytes().to_vec());
        }

        let mut encoder = self.encoding.new_encoder();
        let mut out = Vec::with_capacity(text.len());
        let mut buf = [0u8; 1024];
        let mut src = text;

        loop {
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(src, &mut buf, true);
            out.extend_from_slice(&buf[..written]);
            src = &src[read..];
            match result {
                EncoderResult::InputEmpty => return Ok(out),
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(ch) if self.lossy_output => {
                    tracing::trace!(?ch, encoding = self.name(), "dropping unencodable character");
                }
                EncoderResult::Unmappable(ch) => {
                    return Err(CliError::Unencodable {
                        ch,
                        encoding: self.name(),
                    });
                }
            }
        }
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Writes formatted lines to `W` with a tool's joining convention
pub struct Emitter<W: Write> {
    writer: W,
    style: LineStyle,
    encoding: OutputEncoding,
    lines: usize,
}

impl<W: Write> Emitter<W> {
    pub fn new(writer: W, style: LineStyle, encoding: OutputEncoding) -> Self {
        Self {
            writer,
            style,
            encoding,
            lines: 0,
        }
    }

    /// Number of lines emitted so far
    #[inline]
    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn emit(&mut self, line: &str) -> Result<(), CliError> {
        let text = match self.style {
            LineStyle::Listing => format!("{line}\n"),
            LineStyle::Statement if self.lines == 0 => line.to_owned(),
            LineStyle::Statement => format!(",\n{line}"),
        };
        self.write(&text)?;
        self.lines += 1;
        Ok(())
    }

    /// Write the terminator, flush, and hand back the writer
    pub fn finish(mut self) -> Result<W, CliError> {
        if self.style == LineStyle::Statement {
            self.write(";")?;
        }
        self.writer
            .flush()
            .map_err(|e| CliError::IoError(e.to_string()))?;
        Ok(self.writer)
    }

    fn write(&mut self, text: &str) -> Result<(), CliError> {
        let bytes = self.encoding.encode(text)?;
        self.writer
            .write_all(&bytes)
            .map_err(|e| CliError::IoError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(style: LineStyle, encoding: OutputEncoding, lines: &[&str]) -> Result<Vec<u8>, CliError> {
        let mut emitter = Emitter::new(Vec::new(), style, encoding);
        for line in lines {
            emitter.emit(line)?;
        }
        emitter.finish()
    }

    #[test]
    fn listing_ends_every_line() {
        let out = run(LineStyle::Listing, OutputEncoding::default(), &["A(\"1\")", "B(\"2\")"]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A(\"1\")\nB(\"2\")\n");
    }

    #[test]
    fn statement_joins_and_terminates() {
        let out = run(LineStyle::Statement, OutputEncoding::default(), &["A(\"1\")", "B(\"2\")"]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "A(\"1\"),\nB(\"2\");");
    }

    #[test]
    fn empty_statement_is_just_terminator() {
        let out = run(LineStyle::Statement, OutputEncoding::default(), &[]).unwrap();
        assert_eq!(out, b";");
        let out = run(LineStyle::Listing, OutputEncoding::default(), &[]).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn counts_lines() {
        let mut emitter = Emitter::new(Vec::new(), LineStyle::Listing, OutputEncoding::default());
        emitter.emit("A()").unwrap();
        emitter.emit("B()").unwrap();
        assert_eq!(emitter.lines(), 2);
    }

    #[test]
    fn cyrillic_encodes_to_windows_1251() {
        let enc = OutputEncoding::from_label("windows-1251", false).unwrap();
        assert_eq!(enc.name(), "windows-1251");
        // 'Р' is 0xD0 in windows-1251
        assert_eq!(enc.encode("100Р").unwrap(), b"100\xD0");
    }

    #[test]
    fn strict_encoding_rejects_unmappable() {
        let enc = OutputEncoding::from_label("windows-1251", false).unwrap();
        let err = enc.encode("A(\"日本\")").unwrap_err();
        assert!(matches!(err, CliError::Unencodable { ch: '日', .. }));
    }

    #[test]
    fn lossy_encoding_drops_unmappable() {
        let enc = OutputEncoding::from_label("windows-1251", true).unwrap();
        assert_eq!(enc.encode("A(\"日本x\")").unwrap(), b"A(\"x\")");
        assert_eq!(enc.encode("").unwrap(), b"");
    }

    #[test]
    fn ascii_label_means_windows_1252() {
        // WHATWG maps "ascii" to windows-1252
        let enc = OutputEncoding::from_label("ascii", true).unwrap();
        assert_eq!(enc.encode("café ₽").unwrap(), b"caf\xE9 ");
    }

    #[test]
    fn unknown_label() {
        assert!(matches!(
            OutputEncoding::from_label("klingon", false),
            Err(CliError::UnknownEncoding(_))
        ));
    }
}
