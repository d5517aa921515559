//! csv2enum - print enum constants from a CSV file

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use enumgen::Transform;
use enumgen_cli::commands::csv::{self, CsvOptions};
use enumgen_cli::error::CliError;
use enumgen_cli::output::{self, OutputEncoding};
use enumgen_cli::InvalidPolicy;

/// Print `NAME("v1","v2",...)` for every row of a `;`-delimited CSV file
#[derive(Parser, Debug)]
#[command(name = "csv2enum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input CSV file
    file: PathBuf,

    /// Field delimiter (single ASCII character, `\t` for tab)
    #[arg(short, long, default_value = ";", value_parser = parse_delimiter)]
    delimiter: u8,

    /// Prefix removed from the name column before case conversion
    #[arg(long, value_name = "PREFIX", default_value = "")]
    strip_prefix: String,

    /// Suffix removed from the name column before case conversion
    #[arg(long, value_name = "SUFFIX", default_value = "")]
    strip_suffix: String,

    /// Skip rows whose name column is empty instead of stopping
    #[arg(long)]
    skip_invalid: bool,

    /// Output encoding label (utf-8, windows-1251, ...)
    #[arg(long, value_name = "LABEL", default_value = "utf-8")]
    encoding: String,

    /// Drop characters the output encoding cannot represent
    #[arg(long)]
    lossy: bool,
}

fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("delimiter must be a single ASCII character, got {s:?}")),
    }
}

fn main() -> ExitCode {
    enumgen_cli::init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", output::err_line(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let options = CsvOptions {
        delimiter: cli.delimiter,
        transform: Transform::new(cli.strip_prefix, cli.strip_suffix),
        on_invalid: if cli.skip_invalid {
            InvalidPolicy::Skip
        } else {
            InvalidPolicy::Abort
        },
        encoding: OutputEncoding::from_label(&cli.encoding, cli.lossy)?,
        ..CsvOptions::new(cli.file)
    };

    let stats = csv::run(&options, std::io::stdout().lock())?;
    if stats.skipped > 0 {
        eprintln!(
            "{}",
            output::muted(&format!("{} row(s) skipped", stats.skipped))
        );
    }
    Ok(())
}
