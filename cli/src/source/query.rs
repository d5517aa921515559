//! Database query row source
//!
//! Builds the `SELECT` described by the `[query]` section and runs it through
//! the driver for the configured DBMS.

use enumgen::Row;

use crate::config::{Literal, QuerySection};
use crate::dbms::{ConnectionTarget, Dbms};
use crate::error::CliError;

/// `SELECT <attr>, <columns...> FROM <table> [WHERE <by> NOT IN (...)]`
#[derive(Debug, Clone, PartialEq)]
pub struct SelectQuery<'a> {
    pub attr_column: &'a str,
    pub columns: &'a [String],
    pub table: &'a str,
    pub exclude_by: Option<&'a str>,
    pub exclude: &'a [Literal],
}

impl<'a> From<&'a QuerySection> for SelectQuery<'a> {
    fn from(q: &'a QuerySection) -> Self {
        Self {
            attr_column: &q.attr_column,
            columns: &q.columns,
            table: &q.table,
            exclude_by: q.exclude_by.as_deref(),
            exclude: &q.exclude,
        }
    }
}

impl SelectQuery<'_> {
    /// Render the SQL text. Identifiers are used as written.
    pub fn to_sql(&self) -> String {
        let mut sql = String::from("SELECT ");
        sql.push_str(self.attr_column);
        for col in self.columns {
            sql.push_str(", ");
            sql.push_str(col);
        }
        sql.push_str(" FROM ");
        sql.push_str(self.table);

        if let Some(by) = self.exclude_by.filter(|_| !self.exclude.is_empty()) {
            let list = self
                .exclude
                .iter()
                .map(render_literal)
                .collect::<Vec<_>>()
                .join(", ");
            sql.push_str(&format!(" WHERE {by} NOT IN ({list})"));
        }

        sql
    }
}

/// Render a literal as SQL text, quoting strings
fn render_literal(lit: &Literal) -> String {
    match lit {
        Literal::Int(i) => i.to_string(),
        Literal::Float(f) => f.to_string(),
        Literal::Bool(true) => "TRUE".into(),
        Literal::Bool(false) => "FALSE".into(),
        Literal::Text(s) => format!("'{}'", s.replace('\'', "''")),
    }
}

/// Run `query` against `target` and return its rows, the name column first.
pub fn fetch_rows(
    target: &ConnectionTarget,
    password: &str,
    query: &SelectQuery<'_>,
) -> Result<Vec<Row>, CliError> {
    match target.dbms {
        #[cfg(feature = "postgres-sync")]
        Dbms::Postgres => postgres_sync::fetch_rows(target, password, query),

        #[cfg(not(feature = "postgres-sync"))]
        Dbms::Postgres => {
            let _ = (password, query);
            Err(missing_driver(Dbms::Postgres))
        }

        Dbms::Mssql => {
            let _ = (password, query);
            Err(missing_driver(Dbms::Mssql))
        }
    }
}

/// Fails if no driver for `dbms` is compiled in
pub fn ensure_driver(dbms: Dbms) -> Result<(), CliError> {
    match dbms {
        Dbms::Postgres if cfg!(feature = "postgres-sync") => Ok(()),
        other => Err(missing_driver(other)),
    }
}

fn missing_driver(dbms: Dbms) -> CliError {
    CliError::MissingDriver { dbms }
}

// ============================================================================
// PostgreSQL (postgres - sync)
// ============================================================================

#[cfg(feature = "postgres-sync")]
mod postgres_sync {
    use postgres::error::SqlState;
    use postgres::{Client, NoTls, SimpleQueryMessage};

    use super::*;

    pub(super) fn fetch_rows(
        target: &ConnectionTarget,
        password: &str,
        query: &SelectQuery<'_>,
    ) -> Result<Vec<Row>, CliError> {
        tracing::debug!(uri = %target.redacted_uri(), "connecting");
        let mut client = Client::connect(&target.uri(password), NoTls).map_err(connect_error)?;

        let sql = query.to_sql();
        tracing::debug!(%sql, "query");
        let messages = client
            .simple_query(&sql)
            .map_err(|e| CliError::QueryError(format!("{e}\n{sql}")))?;

        let rows: Vec<Row> = messages
            .iter()
            .filter_map(|msg| match msg {
                SimpleQueryMessage::Row(row) => {
                    Some(Row::new((0..row.len()).map(|i| row.get(i).unwrap_or_default())))
                }
                _ => None,
            })
            .collect();

        tracing::info!(rows = rows.len(), "query finished");
        Ok(rows)
    }

    /// Authorization failures (SQLSTATE class 28) are retryable
    fn connect_error(e: postgres::Error) -> CliError {
        match e.code() {
            Some(code)
                if *code == SqlState::INVALID_PASSWORD
                    || *code == SqlState::INVALID_AUTHORIZATION_SPECIFICATION =>
            {
                CliError::AuthenticationFailed(e.to_string())
            }
            _ => CliError::ConnectionError(format!("Failed to connect to PostgreSQL: {e}")),
        }
    }
}
