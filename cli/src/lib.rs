//! enumgen CLI - print enum constants from CSV files and SQL queries
//!
//! Two binaries share this crate:
//!
//! - `csv2enum <FILE>` reads a `;`-delimited CSV file and prints one
//!   `NAME("v1","v2")` line per row.
//! - `enum-builder [-c db.toml]` runs a `SELECT` described by a TOML file and
//!   prints the rows as a single enum statement (`,\n` between rows, `;` at
//!   the end), prompting for the database password.
//!
//! # Configuration
//!
//! ```toml
//! [database]
//! dbms = "postgres"
//! address = "localhost:5432"
//! user = "app"
//! db = "shop"
//!
//! [query]
//! attr_column = "code"
//! columns = ["id", "title"]
//! table = "order_status"
//! exclude_by = "id"
//! exclude = [0]
//! remove_prefix = "ST_"
//! remove_suffix = ""
//! ```
//!
//! Log output goes to stderr and is controlled by `ENUMGEN_LOG`
//! (e.g. `ENUMGEN_LOG=debug`).

pub mod commands;
pub mod config;
pub mod dbms;
pub mod error;
pub mod output;
pub mod retry;
pub mod source;

pub use config::{Config, Error as ConfigError, InvalidPolicy};
pub use dbms::Dbms;
pub use error::CliError;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "ENUMGEN_LOG";

/// Install the stderr log subscriber. Defaults to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
