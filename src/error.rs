//! Error types for identifier and row formatting

use thiserror::Error;

/// Why a name source could not become an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// Empty or whitespace only
    Blank,
    /// Nothing left once the prefix and suffix were removed
    EmptyAfterStrip,
    /// Only separators and symbols, no letters or digits
    NoWordCharacters,
}

impl std::fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Blank => "value is blank",
            Self::EmptyAfterStrip => "nothing left after removing prefix/suffix",
            Self::NoWordCharacters => "value has no letters or digits",
        })
    }
}

/// Formatting errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("invalid identifier source {raw:?}: {reason}")]
    InvalidIdentifierSource { raw: String, reason: InvalidReason },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
