//! Row sources: CSV files and database queries

pub mod csv;
pub mod query;

pub use self::csv::CsvSource;
pub use self::query::{SelectQuery, fetch_rows};
