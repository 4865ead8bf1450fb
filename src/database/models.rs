/*!
 * Data models for rows read from a backup database.
 */

use chrono::{NaiveDate, NaiveTime};
use rusqlite::types::ValueRef;
use std::fmt;

/// A single cell value
///
/// The first four variants are what SQLite hands back. `Date`, `Time` and
/// `Duration` only appear after reformatting for a spreadsheet destination.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// SQL NULL
    Null,
    /// Integer storage class
    Integer(i64),
    /// Real storage class
    Real(f64),
    /// Text storage class (blobs are decoded lossily)
    Text(String),
    /// Calendar date
    Date(NaiveDate),
    /// Time of day
    Time(NaiveTime),
    /// Elapsed time in whole seconds
    Duration(i64),
}

impl Value {
    /// Build a text value
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// NULL or an empty/blank string
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Borrow the text content, if this is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as an integer count of milliseconds
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::Real(f) if f.is_finite() => Some(*f as i64),
            Self::Text(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }
}

impl From<ValueRef<'_>> for Value {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => Self::Null,
            ValueRef::Integer(i) => Self::Integer(i),
            ValueRef::Real(f) => Self::Real(f),
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
                Self::Text(String::from_utf8_lossy(bytes).into_owned())
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Real(r) => write!(f, "{}", r),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Self::Duration(secs) => {
                let sign = if *secs < 0 { "-" } else { "" };
                let secs = secs.unsigned_abs();
                write!(f, "{}{:02}:{:02}:{:02}", sign, secs / 3600, (secs % 3600) / 60, secs % 60)
            }
        }
    }
}

/// One row, positionally aligned with a column list
pub type Row = Vec<Value>;

/// A table as read for one export run
#[derive(Debug, Clone, PartialEq)]
pub struct TableDescriptor {
    /// Name in the source vocabulary
    pub name: String,
    /// Column names in the source vocabulary
    pub columns: Vec<String>,
    /// Rows, aligned with `columns`
    pub rows: Vec<Row>,
}
