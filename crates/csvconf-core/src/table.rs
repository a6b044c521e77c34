//! Core table types for representing loaded CSV data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

/// A parsed table from a single CSV file
#[derive(Debug, Clone)]
pub struct Table {
    /// Table name (file basename without suffix)
    pub name: String,
    /// Header names in file order
    pub headers: Vec<String>,
    /// Row data in file order
    pub rows: Vec<Arc<Row>>,
    /// Source file path
    pub source_path: PathBuf,
}

impl Table {
    /// Create a new empty table
    pub fn new(name: impl Into<String>, source_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            source_path,
        }
    }

    /// Header names in the order they appear in the file
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Get the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One data record, keyed by header name.
///
/// Values are kept as the raw strings from the file; converting them to
/// numbers or flags is up to the caller. Fields are kept sorted by name so a
/// row always serializes the same way.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, String>,
}

impl Row {
    /// Create an empty row
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row by pairing headers with values by position.
    ///
    /// Values past the end of `headers` are ignored and headers past the end
    /// of `values` are simply absent. A repeated header keeps its last value.
    pub fn from_record<H, V, K, S>(headers: H, values: V) -> Self
    where
        H: IntoIterator<Item = K>,
        V: IntoIterator<Item = S>,
        K: Into<String>,
        S: Into<String>,
    {
        headers.into_iter().zip(values).collect()
    }

    /// Get a field value by header name
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// All fields of the row, sorted by name
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Row {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
