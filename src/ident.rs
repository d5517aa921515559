//! Identifier formatting
//!
//! Turns a raw column value into an `UPPER_SNAKE_CASE` enum constant name.

use heck::ToShoutySnakeCase;

use crate::error::{Error, InvalidReason};

/// Prefix/suffix removal applied before case conversion.
///
/// Both sides are matched exactly (case-sensitive) against the trimmed value
/// and removed at most once. Empty strings disable the respective check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transform {
    pub strip_prefix: String,
    pub strip_suffix: String,
}

impl Transform {
    pub fn new(strip_prefix: impl Into<String>, strip_suffix: impl Into<String>) -> Self {
        Self {
            strip_prefix: strip_prefix.into(),
            strip_suffix: strip_suffix.into(),
        }
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.strip_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.strip_suffix = suffix.into();
        self
    }

    /// Trim `raw` and remove the configured prefix and suffix.
    fn strip<'a>(&self, raw: &'a str) -> &'a str {
        let mut s = raw.trim();
        if !self.strip_prefix.is_empty() {
            s = s.strip_prefix(self.strip_prefix.as_str()).unwrap_or(s);
        }
        if !self.strip_suffix.is_empty() {
            s = s.strip_suffix(self.strip_suffix.as_str()).unwrap_or(s);
        }
        s
    }
}

/// Format `raw` as an enum constant name.
///
/// ```
/// use enumgen::{format_identifier, Transform};
///
/// let plain = Transform::default();
/// assert_eq!(format_identifier("userName", &plain).unwrap(), "USER_NAME");
///
/// let tbl = Transform::default().with_prefix("tbl_");
/// assert_eq!(format_identifier("tbl_statusCode", &tbl).unwrap(), "STATUS_CODE");
/// ```
///
/// # Errors
///
/// [`Error::InvalidIdentifierSource`] when `raw` is blank, when nothing is
/// left after stripping, or when the value has no letters or digits at all.
///
/// The last case is stricter than plain case conversion: a value made only of
/// separators (`"--"`, `"!!!"`) converts to an empty string, and is rejected
/// with [`InvalidReason::NoWordCharacters`] instead of yielding a nameless
/// constant.
///
/// ```
/// use enumgen::{format_identifier, Error, InvalidReason, Transform};
///
/// let err = format_identifier("--", &Transform::default()).unwrap_err();
/// assert!(matches!(
///     err,
///     Error::InvalidIdentifierSource { reason: InvalidReason::NoWordCharacters, .. }
/// ));
/// ```
pub fn format_identifier(raw: &str, transform: &Transform) -> Result<String, Error> {
    let invalid = |reason| Error::InvalidIdentifierSource {
        raw: raw.to_owned(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(invalid(InvalidReason::Blank));
    }

    let stripped = transform.strip(raw);
    if stripped.is_empty() {
        return Err(invalid(InvalidReason::EmptyAfterStrip));
    }

    let converted = collapse_underscores(&stripped.to_shouty_snake_case());
    let ident = converted.strip_prefix('_').unwrap_or(&converted);
    if ident.is_empty() {
        return Err(invalid(InvalidReason::NoWordCharacters));
    }

    Ok(ident.to_owned())
}

/// Replace every run of underscores with a single one.
fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_underscore = false;
    for c in s.chars() {
        if c == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(c);
    }
    out
}
