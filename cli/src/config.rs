//! Configuration for `enum-builder`
//!
//! Loads `db.toml` into typed sections once at startup.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use enumgen::Transform;

use crate::dbms::{ConnectionTarget, Dbms, UnknownDbms};

pub const CONFIG_FILE: &str = "db.toml";

// ============================================================================
// Sections
// ============================================================================

/// `[database]` section. A `password` key is accepted and ignored; the
/// password is always prompted for.
#[derive(Debug, Deserialize)]
struct DatabaseSection {
    dbms: String,
    address: String,
    user: String,
    db: String,
}

/// `[query]` section
#[derive(Debug, Clone, Deserialize)]
pub struct QuerySection {
    pub attr_column: String,
    #[serde(default)]
    pub columns: Vec<String>,
    pub table: String,
    #[serde(default)]
    pub exclude_by: Option<String>,
    #[serde(default)]
    pub exclude: Vec<Literal>,
    #[serde(default)]
    pub remove_prefix: String,
    #[serde(default)]
    pub remove_suffix: String,
    #[serde(default)]
    pub on_invalid: InvalidPolicy,
}

impl QuerySection {
    pub fn transform(&self) -> Transform {
        Transform::new(&self.remove_prefix, &self.remove_suffix)
    }
}

/// A value from the `exclude` list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

impl Literal {
    /// `false` only for NaN and infinite floats, which have no SQL literal
    pub fn is_finite(&self) -> bool {
        match self {
            Self::Float(f) => f.is_finite(),
            _ => true,
        }
    }
}

/// What to do with a row whose name column cannot become an identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidPolicy {
    /// Stop the whole run
    #[default]
    Abort,
    /// Log a warning and leave the row out
    Skip,
}

// ============================================================================
// Configuration
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone)]
pub struct Config {
    pub target: ConnectionTarget,
    pub query: QuerySection,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    database: DatabaseSection,
    query: QuerySection,
}

impl Config {
    /// Load from specific path
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::NotFound(path.into())
            } else {
                Error::Io(path.into(), e)
            }
        })?;

        Self::parse(&content).map_err(|e| match e {
            Error::Parse(_, err) => Error::Parse(path.into(), err),
            other => other,
        })
    }

    /// Parse and validate config text
    pub fn parse(content: &str) -> Result<Self, Error> {
        let raw: RawConfig =
            toml::from_str(content).map_err(|e| Error::Parse(PathBuf::new(), e))?;
        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> Result<Self, Error> {
        let RawConfig { database, query } = raw;
        let dbms = Dbms::resolve(&database.dbms)?;

        if query.attr_column.trim().is_empty() {
            return Err(Error::Invalid("query.attr_column must not be empty".into()));
        }
        if query.table.trim().is_empty() {
            return Err(Error::Invalid("query.table must not be empty".into()));
        }
        if !query.exclude.is_empty() && query.exclude_by.is_none() {
            return Err(Error::Invalid("query.exclude requires query.exclude_by".into()));
        }
        if let Some(value) = query.exclude.iter().find(|lit| !lit.is_finite()) {
            return Err(Error::Invalid(format!(
                "query.exclude value {value:?} is not a finite number"
            )));
        }

        let target = ConnectionTarget {
            dbms,
            address: database.address,
            user: database.user,
            db: database.db,
        };

        Ok(Self { target, query })
    }
}

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error(transparent)]
    UnknownDbms(#[from] UnknownDbms),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigError = Error;

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
        [database]
        dbms = "postgres"
        address = "localhost:5432"
        user = "app"
        password = "ignored"
        db = "shop"

        [query]
        attr_column = "code"
        columns = ["id", "title"]
        table = "order_status"
        exclude_by = "id"
        exclude = [0, "legacy", 1.5, true]
        remove_prefix = "ST_"
        remove_suffix = "_CODE"
        on_invalid = "skip"
    "#;

    #[test]
    fn full() {
        let cfg = Config::parse(FULL).unwrap();
        assert_eq!(cfg.target.dbms, Dbms::Postgres);
        assert_eq!(cfg.target.address, "localhost:5432");
        assert_eq!(cfg.query.columns, ["id", "title"]);
        assert_eq!(
            cfg.query.exclude,
            [
                Literal::Int(0),
                Literal::Text("legacy".into()),
                Literal::Float(1.5),
                Literal::Bool(true)
            ]
        );
        assert_eq!(cfg.query.on_invalid, InvalidPolicy::Skip);
        assert_eq!(cfg.query.transform(), Transform::new("ST_", "_CODE"));
    }

    #[test]
    fn defaults() {
        let cfg = Config::parse(
            r#"
            [database]
            dbms = "pg"
            address = "db"
            user = "u"
            db = "d"

            [query]
            attr_column = "name"
            table = "t"
        "#,
        )
        .unwrap();
        assert!(cfg.query.columns.is_empty());
        assert!(cfg.query.exclude.is_empty());
        assert_eq!(cfg.query.exclude_by, None);
        assert_eq!(cfg.query.on_invalid, InvalidPolicy::Abort);
        assert_eq!(cfg.query.transform(), Transform::default());
    }

    #[test]
    fn unknown_dbms() {
        let err = Config::parse(&FULL.replace("\"postgres\"", "\"nosuchdb\"")).unwrap_err();
        assert!(matches!(err, Error::UnknownDbms(UnknownDbms(ref name)) if name == "nosuchdb"));
    }

    #[test]
    fn mssql_alias() {
        let cfg = Config::parse(&FULL.replace("\"postgres\"", "\"sql-server\"")).unwrap();
        assert_eq!(cfg.target.dbms, Dbms::Mssql);
    }

    #[test]
    fn exclude_without_column() {
        let err = Config::parse(&FULL.replace("exclude_by = \"id\"", "")).unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[test]
    fn non_finite_exclude_values() {
        for value in ["nan", "inf", "-inf"] {
            let err = Config::parse(&FULL.replace("1.5", value)).unwrap_err();
            assert!(
                matches!(err, Error::Invalid(ref msg) if msg.contains("finite")),
                "{value}: {err}"
            );
        }
    }

    #[test]
    fn missing_section() {
        let err = Config::parse("[database]\ndbms = \"pg\"").unwrap_err();
        assert!(matches!(err, Error::Parse(..)));
    }

    #[test]
    fn missing_file() {
        let err = Config::load_from(Path::new("definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
        assert!(err.to_string().contains("here.toml"));
    }
}
