//! Row formatting
//!
//! A [`Row`] is a name source followed by value fields. [`format_row`] turns it
//! into `IDENT("V1","V2",...)`; joining lines together is left to the caller.

use crate::error::Error;
use crate::ident::{Transform, format_identifier};

/// Currency glyphs swapped for look-alike letters when quoting values.
const GLYPH_SUBSTITUTIONS: &[(char, char)] = &[('₽', 'Р')];

/// One record of the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    name: String,
    values: Vec<String>,
}

impl Row {
    /// Build a row from its fields in order; the first one is the name source.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = fields.into_iter().map(Into::into);
        let name = fields.next().unwrap_or_default();
        Self {
            name,
            values: fields.collect(),
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Double-quote a value, replacing currency glyphs.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    out.extend(value.chars().map(substitute_glyph));
    out.push('"');
    out
}

fn substitute_glyph(c: char) -> char {
    GLYPH_SUBSTITUTIONS
        .iter()
        .find_map(|&(from, to)| (from == c).then_some(to))
        .unwrap_or(c)
}

/// Format a row as `IDENT("V1","V2",...)`.
///
/// ```
/// use enumgen::{format_row, Row, Transform};
///
/// let row = Row::new(["statusActive", "A", "Active status"]);
/// let line = format_row(&row, &Transform::default()).unwrap();
/// assert_eq!(line, r#"STATUS_ACTIVE("A","Active status")"#);
/// ```
pub fn format_row(row: &Row, transform: &Transform) -> Result<String, Error> {
    let ident = format_identifier(row.name(), transform)?;
    let values = row
        .values()
        .iter()
        .map(|v| quote(v))
        .collect::<Vec<_>>()
        .join(",");
    Ok(format!("{ident}({values})"))
}
