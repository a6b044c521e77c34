//! Equality predicates used to filter table rows

use crate::error::{Error, Result};
use crate::table::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single `field == value` test
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Header name to look up
    pub field: String,
    /// Expected value
    pub value: String,
}

impl Query {
    /// Create a new predicate
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Parse a `field=value` string. Only the first `=` separates; the value
    /// may itself contain `=` or be empty.
    pub fn parse(s: &str) -> Result<Self> {
        match s.split_once('=') {
            Some((field, value)) if !field.is_empty() => Ok(Self::new(field, value)),
            _ => Err(Error::InvalidQuery(s.to_string())),
        }
    }

    /// Whether the row carries this field with exactly this value
    pub fn matches(&self, row: &Row) -> bool {
        row.get(&self.field) == Some(self.value.as_str())
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.field, self.value)
    }
}

impl<F: Into<String>, V: Into<String>> From<(F, V)> for Query {
    fn from((field, value): (F, V)) -> Self {
        Self::new(field, value)
    }
}

/// Check a row against every predicate.
///
/// Stops at the first predicate that fails, including one whose field the
/// row lacks. That only rejects this row; callers keep scanning.
pub fn matches_all(row: &Row, queries: &[Query]) -> bool {
    queries.iter().all(|q| q.matches(row))
}
