//! # enumgen
//!
//! Turns tabular rows into enum constant declarations of the shape
//! `CONSTANT_NAME("field1","field2",...)`.
//!
//! ```
//! use enumgen::{format_row, Row, Transform};
//!
//! let transform = Transform::default().with_suffix("_id");
//! let row = Row::new(["customer_id", "42", "100₽"]);
//!
//! assert_eq!(
//!     format_row(&row, &transform).unwrap(),
//!     r#"CUSTOMER("42","100Р")"#
//! );
//! ```
//!
//! The formatting here is pure. Reading CSV files, querying databases and
//! writing output live in the `enumgen-cli` crate.

pub mod error;
pub mod ident;
pub mod row;

pub use error::{Error, InvalidReason, Result};
pub use ident::{Transform, format_identifier};
pub use row::{Row, format_row, quote};
