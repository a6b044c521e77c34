//! The set of loaded tables and the read-only query operations over it

use crate::query::{matches_all, Query};
use crate::table::{Row, Table};
use std::collections::HashMap;
use std::sync::Arc;

/// Loaded tables by name. Immutable once built; a reload produces a new
/// registry rather than changing this one.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tables: HashMap<String, Arc<Table>>,
}

impl Registry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table, replacing any table with the same name
    pub fn insert(&mut self, table: Table) {
        self.tables.insert(table.name.clone(), Arc::new(table));
    }

    /// Look up a table by name
    pub fn table(&self, name: &str) -> Option<&Arc<Table>> {
        self.tables.get(name)
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.tables.contains_key(name)
    }

    /// Names of all loaded tables, sorted
    pub fn table_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Value of `result_field` on the first row whose `query_field` equals
    /// `query_value`. Empty string when the table, row or field is missing.
    pub fn get_string(
        &self,
        table: &str,
        query_field: &str,
        query_value: &str,
        result_field: &str,
    ) -> String {
        self.find_first(table, query_field, query_value)
            .and_then(|row| row.get(result_field))
            .unwrap_or_default()
            .to_string()
    }

    fn find_first(&self, table: &str, field: &str, value: &str) -> Option<&Arc<Row>> {
        self.tables
            .get(table)?
            .rows
            .iter()
            .find(|row| row.get(field) == Some(value))
    }

    /// Every row matching all predicates, in table order. Unknown table
    /// yields no rows.
    pub fn get_lines(&self, table: &str, queries: &[Query]) -> Vec<Arc<Row>> {
        let Some(table) = self.tables.get(table) else {
            return Vec::new();
        };
        table
            .rows
            .iter()
            .filter(|row| matches_all(row, queries))
            .cloned()
            .collect()
    }

    /// First row matching all predicates
    pub fn get_line(&self, table: &str, queries: &[Query]) -> Option<Arc<Row>> {
        self.tables
            .get(table)?
            .rows
            .iter()
            .find(|row| matches_all(row, queries))
            .cloned()
    }

    /// All rows of a table in order, or `None` if the table is not loaded
    pub fn get_all(&self, table: &str) -> Option<Vec<Arc<Row>>> {
        self.tables.get(table).map(|t| t.rows.clone())
    }
}
