//! enum-builder - print enum constants from a database table

use clap::Parser;
use inquire::Password;
use std::path::PathBuf;
use std::process::ExitCode;

use enumgen_cli::commands::build;
use enumgen_cli::config::{CONFIG_FILE, Config};
use enumgen_cli::error::CliError;
use enumgen_cli::output::{self, OutputEncoding};
use enumgen_cli::retry::Outcome;

/// Query a table and print its rows as an enum statement
#[derive(Parser, Debug)]
#[command(name = "enum-builder")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// .toml file with the database and query configuration
    #[arg(short, long, value_name = "PATH", default_value = CONFIG_FILE)]
    config: PathBuf,

    /// Output encoding label (utf-8, windows-1251, ...)
    #[arg(long, value_name = "LABEL", default_value = "utf-8")]
    encoding: String,

    /// Drop characters the output encoding cannot represent
    #[arg(long)]
    lossy: bool,
}

fn main() -> ExitCode {
    enumgen_cli::init_tracing();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(%e, "enum-builder failed");
            eprintln!("{}", output::err_line(&e.to_string()));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = Config::load_from(&cli.config)?;
    let encoding = OutputEncoding::from_label(&cli.encoding, cli.lossy)?;

    let outcome = build::run(&config, encoding, std::io::stdout().lock(), ask_password)?;

    match outcome {
        Outcome::Done(stats) => {
            if stats.skipped > 0 {
                eprintln!(
                    "{}",
                    output::muted(&format!("{} row(s) skipped", stats.skipped))
                );
            }
        }
        Outcome::Exhausted(err) => {
            tracing::debug!(%err, "giving up after {} attempts", build::PASSWORD_ATTEMPTS);
            eprintln!("{}", output::warning("Better luck next time!"));
        }
    }
    Ok(())
}

fn ask_password() -> Result<String, CliError> {
    Password::new("DB Password:")
        .without_confirmation()
        .prompt()
        .map_err(|e| CliError::Prompt(e.to_string()))
}
