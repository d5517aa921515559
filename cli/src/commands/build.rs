//! `enum-builder` implementation
//!
//! Queries the configured table and prints the rows as one enum statement.
//! The password is asked for on every attempt; authentication failures are
//! retried a bounded number of times.

use std::io::Write;

use enumgen::Row;

use crate::commands::{RowFormatter, RunStats};
use crate::config::Config;
use crate::error::CliError;
use crate::output::{self, Emitter, LineStyle, OutputEncoding};
use crate::retry::{Outcome, RetryPolicy};
use crate::source::SelectQuery;
use crate::source::query::{ensure_driver, fetch_rows};

/// Password attempts before giving up
pub const PASSWORD_ATTEMPTS: u32 = 3;

/// Run the builder against the configured database, writing the statement
/// to `writer`.
///
/// `ask_password` is called once per attempt. Returns
/// [`Outcome::Exhausted`] when every attempt was rejected by the server.
pub fn run<W, P>(
    config: &Config,
    encoding: OutputEncoding,
    writer: W,
    ask_password: P,
) -> Result<Outcome<RunStats, CliError>, CliError>
where
    W: Write,
    P: FnMut() -> Result<String, CliError>,
{
    ensure_driver(config.target.dbms)?;

    let query = SelectQuery::from(&config.query);
    run_with(config, encoding, writer, ask_password, |password| {
        fetch_rows(&config.target, password, &query)
    })
}

/// Like [`run`], with rows coming from `fetch` instead of a database
/// connection. `fetch` gets the password entered for the attempt.
pub fn run_with<W, P, F>(
    config: &Config,
    encoding: OutputEncoding,
    writer: W,
    mut ask_password: P,
    mut fetch: F,
) -> Result<Outcome<RunStats, CliError>, CliError>
where
    W: Write,
    P: FnMut() -> Result<String, CliError>,
    F: FnMut(&str) -> Result<Vec<Row>, CliError>,
{
    let fetched = RetryPolicy::new(PASSWORD_ATTEMPTS).run(
        |attempt| {
            tracing::debug!(attempt, "fetching rows");
            let password = ask_password()?;
            fetch(&password)
        },
        |left, err| {
            tracing::debug!(%err, "rejected credentials");
            eprintln!(
                "{}",
                output::warning(&format!("Wrong password! Attempts left: {left}"))
            );
        },
    )?;

    let rows = match fetched {
        Outcome::Done(rows) => rows,
        Outcome::Exhausted(err) => return Ok(Outcome::Exhausted(err)),
    };

    // Format everything before writing so a bad row leaves no partial output.
    let transform = config.query.transform();
    let mut formatter = RowFormatter::new(&transform, config.query.on_invalid);
    let lines = rows
        .iter()
        .enumerate()
        .filter_map(|(index, row)| formatter.format(index + 1, row).transpose())
        .collect::<Result<Vec<_>, _>>()?;

    let mut emitter = Emitter::new(writer, LineStyle::Statement, encoding);
    for line in &lines {
        emitter.emit(line)?;
    }
    emitter.finish()?;

    Ok(Outcome::Done(RunStats {
        written: lines.len(),
        skipped: formatter.skipped(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dbms::Dbms;

    const PG_CONFIG: &str = r#"
        [database]
        dbms = "pg"
        address = "localhost"
        user = "app"
        db = "shop"

        [query]
        attr_column = "code"
        columns = ["id"]
        table = "statuses"
        remove_prefix = "ST_"
    "#;

    fn pg_config(on_invalid: &str) -> Config {
        Config::parse(&format!("{PG_CONFIG}on_invalid = \"{on_invalid}\"\n")).unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            Row::new(["ST_orderPaid", "1"]),
            Row::new(["", "2"]),
            Row::new(["ST_orderShipped", "3"]),
        ]
    }

    #[test]
    fn every_attempt_prompts_until_exhausted() {
        let config = pg_config("abort");
        let mut prompts = 0;
        let mut fetches = Vec::new();
        let mut out = Vec::new();

        let outcome = run_with(
            &config,
            OutputEncoding::default(),
            &mut out,
            || {
                prompts += 1;
                Ok(format!("guess{prompts}"))
            },
            |password| {
                fetches.push(password.to_owned());
                Err(CliError::AuthenticationFailed("password authentication failed".into()))
            },
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::Exhausted(CliError::AuthenticationFailed(_))));
        assert_eq!(prompts, PASSWORD_ATTEMPTS);
        assert_eq!(fetches, ["guess1", "guess2", "guess3"]);
        assert!(out.is_empty());
    }

    #[test]
    fn retry_then_statement_output() {
        let config = pg_config("abort");
        let mut attempts = 0;
        let mut out = Vec::new();

        let outcome = run_with(
            &config,
            OutputEncoding::default(),
            &mut out,
            || Ok("secret".into()),
            |_| {
                attempts += 1;
                if attempts == 1 {
                    Err(CliError::AuthenticationFailed("denied".into()))
                } else {
                    Ok(vec![Row::new(["ST_orderPaid", "1"]), Row::new(["ST_orderShipped", "3₽"])])
                }
            },
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::Done(RunStats { written: 2, skipped: 0 })));
        assert_eq!(attempts, 2);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ORDER_PAID(\"1\"),\nORDER_SHIPPED(\"3Р\");"
        );
    }

    #[test]
    fn empty_result_is_just_terminator() {
        let config = pg_config("abort");
        let mut out = Vec::new();

        let outcome = run_with(
            &config,
            OutputEncoding::default(),
            &mut out,
            || Ok(String::new()),
            |_| Ok(Vec::new()),
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::Done(RunStats { written: 0, skipped: 0 })));
        assert_eq!(out, b";");
    }

    #[test]
    fn abort_writes_nothing() {
        let config = pg_config("abort");
        let mut out = Vec::new();

        let err = run_with(
            &config,
            OutputEncoding::default(),
            &mut out,
            || Ok(String::new()),
            |_| Ok(rows()),
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Identifier(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn skip_leaves_row_out() {
        let config = pg_config("skip");
        let mut out = Vec::new();

        let outcome = run_with(
            &config,
            OutputEncoding::default(),
            &mut out,
            || Ok(String::new()),
            |_| Ok(rows()),
        )
        .unwrap();

        assert!(matches!(outcome, Outcome::Done(RunStats { written: 2, skipped: 1 })));
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "ORDER_PAID(\"1\"),\nORDER_SHIPPED(\"3\");"
        );
    }

    #[test]
    fn connection_error_is_not_retried() {
        let config = pg_config("abort");
        let mut prompts = 0;
        let mut out = Vec::new();

        let err = run_with(
            &config,
            OutputEncoding::default(),
            &mut out,
            || {
                prompts += 1;
                Ok(String::new())
            },
            |_| Err(CliError::ConnectionError("refused".into())),
        )
        .unwrap_err();

        assert!(matches!(err, CliError::ConnectionError(_)));
        assert_eq!(prompts, 1);
        assert!(out.is_empty());
    }

    #[test]
    fn unsupported_dbms_fails_before_prompting() {
        let config = Config::parse(
            r#"
            [database]
            dbms = "mssql"
            address = "localhost"
            user = "sa"
            db = "shop"

            [query]
            attr_column = "code"
            table = "statuses"
        "#,
        )
        .unwrap();

        let mut prompted = false;
        let result = run(&config, OutputEncoding::default(), Vec::new(), || {
            prompted = true;
            Ok(String::new())
        });

        assert!(matches!(
            result,
            Err(CliError::MissingDriver { dbms: Dbms::Mssql, .. })
        ));
        assert!(!prompted);
    }

    #[test]
    fn prompt_failure_is_not_retried() {
        let config = Config::parse(
            r#"
            [database]
            dbms = "pg"
            address = "localhost"
            user = "app"
            db = "shop"

            [query]
            attr_column = "code"
            table = "statuses"
        "#,
        )
        .unwrap();

        let mut prompts = 0;
        let result = run(&config, OutputEncoding::default(), Vec::new(), || {
            prompts += 1;
            Err(CliError::Prompt("cancelled".into()))
        });

        if cfg!(feature = "postgres-sync") {
            assert!(matches!(result, Err(CliError::Prompt(_))));
            assert_eq!(prompts, 1);
        } else {
            assert!(matches!(result, Err(CliError::MissingDriver { .. })));
        }
    }
}
