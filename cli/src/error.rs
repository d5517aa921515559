//! Error types for the CLI

use thiserror::Error;

use crate::config::ConfigError;
use crate::dbms::Dbms;
use crate::retry::Retryable;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(String),

    /// Malformed CSV input
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Name column could not become an identifier
    #[error("{0}")]
    Identifier(#[from] enumgen::Error),

    /// Could not reach the database
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Database rejected the credentials
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Query execution failed
    #[error("Query error: {0}")]
    QueryError(String),

    /// No driver compiled in for this DBMS
    #[error("{dbms} is not supported by this build")]
    MissingDriver { dbms: Dbms },

    /// Interactive prompt failed or was cancelled
    #[error("Prompt cancelled: {0}")]
    Prompt(String),

    /// Unrecognised output encoding label
    #[error("unknown output encoding: {0}")]
    UnknownEncoding(String),

    /// Character not representable in the output encoding
    #[error("cannot encode {ch:?} as {encoding} (use --lossy to drop such characters)")]
    Unencodable { ch: char, encoding: &'static str },
}

impl Retryable for CliError {
    fn is_retryable(&self) -> bool {
        matches!(self, Self::AuthenticationFailed(_))
    }
}
