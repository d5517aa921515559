//! DBMS alias resolution and connection URIs

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters left untouched in the userinfo part of a URI
const USERINFO: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Supported database systems
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dbms {
    Postgres,
    Mssql,
}

const POSTGRES_ALIASES: &[&str] = &["postgres", "postgresql", "psql", "pg", "pgsql", "posgres"];

const MSSQL_ALIASES: &[&str] = &[
    "sql-server",
    "ms",
    "mssql",
    "ms-sql",
    "ms-sql-server",
    "sqlserver",
    "sql_server",
];

impl Dbms {
    /// Resolve a user-facing alias (ASCII case-insensitive).
    ///
    /// ```
    /// use enumgen_cli::dbms::Dbms;
    ///
    /// assert_eq!(Dbms::resolve("pg").unwrap(), Dbms::Postgres);
    /// assert_eq!(Dbms::resolve("sql_server").unwrap(), Dbms::Mssql);
    /// assert!(Dbms::resolve("nosuchdb").is_err());
    /// ```
    pub fn resolve(alias: &str) -> Result<Self, UnknownDbms> {
        let alias = alias.trim();
        let matches = |aliases: &[&str]| aliases.iter().any(|a| a.eq_ignore_ascii_case(alias));

        if matches(POSTGRES_ALIASES) {
            Ok(Self::Postgres)
        } else if matches(MSSQL_ALIASES) {
            Ok(Self::Mssql)
        } else {
            Err(UnknownDbms(alias.to_owned()))
        }
    }

    /// URI scheme used to connect
    #[inline]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Postgres => "postgresql",
            Self::Mssql => "mssql",
        }
    }

    #[inline]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Postgres => "PostgreSQL",
            Self::Mssql => "SQL Server",
        }
    }
}

impl std::fmt::Display for Dbms {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("DBMS {0:?} not found")]
pub struct UnknownDbms(pub String);

/// Where to connect, minus the password
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionTarget {
    pub dbms: Dbms,
    pub address: String,
    pub user: String,
    pub db: String,
}

impl ConnectionTarget {
    /// Build the connection URI for the given password
    pub fn uri(&self, password: &str) -> String {
        self.format_uri(&utf8_percent_encode(password, USERINFO).to_string())
    }

    /// URI with the password masked, for logs
    pub fn redacted_uri(&self) -> String {
        self.format_uri("***")
    }

    fn format_uri(&self, password: &str) -> String {
        let user = utf8_percent_encode(&self.user, USERINFO);
        format!(
            "{}://{user}:{password}@{}/{}",
            self.dbms.scheme(),
            self.address,
            self.db
        )
    }
}
