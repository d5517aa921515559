//! Command implementations

pub mod build;
pub mod csv;

use enumgen::{Row, Transform, format_row};

use crate::config::InvalidPolicy;
use crate::error::CliError;

/// Counts reported after a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub written: usize,
    pub skipped: usize,
}

/// Formats rows while applying the invalid-name policy
pub struct RowFormatter<'a> {
    transform: &'a Transform,
    policy: InvalidPolicy,
    skipped: usize,
}

impl<'a> RowFormatter<'a> {
    pub fn new(transform: &'a Transform, policy: InvalidPolicy) -> Self {
        Self {
            transform,
            policy,
            skipped: 0,
        }
    }

    /// Format one row. `Ok(None)` means the row was skipped.
    ///
    /// `line` is the 1-based row number used in warnings.
    pub fn format(&mut self, line: usize, row: &Row) -> Result<Option<String>, CliError> {
        match format_row(row, self.transform) {
            Ok(formatted) => Ok(Some(formatted)),
            Err(err) if self.policy == InvalidPolicy::Skip => {
                tracing::warn!(row = line, %err, "skipping row");
                self.skipped += 1;
                Ok(None)
            }
            Err(err) => Err(err.into()),
        }
    }

    #[inline]
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}
