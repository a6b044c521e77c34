//! The table store: loads named tables from disk and answers queries
//!
//! A [`Store`] owns one [`Registry`]. Every call to [`Store::load`] builds a
//! brand new registry and swaps it in whole, so readers never see a
//! half-loaded set of tables. If a load fails the store is left empty.

use crate::config::StoreConfig;
use crate::discovery::discover_tables;
use crate::error::Result;
use crate::parser::parse_table;
use crate::query::Query;
use crate::registry::Registry;
use crate::resolver::Resolver;
use crate::table::Row;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Summary of one table read during a load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    /// Table name
    pub name: String,
    /// File the table was read from
    pub path: PathBuf,
    /// Number of data rows
    pub rows: usize,
}

/// Outcome of a successful load
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    /// Increases by one on every load attempt against the store
    pub generation: u64,
    /// When the load finished
    pub loaded_at: DateTime<Utc>,
    /// Tables in the order they were loaded
    pub tables: Vec<TableSummary>,
}

impl LoadReport {
    /// Total rows across all tables
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }
}

#[derive(Debug, Default)]
struct LoadState {
    generation: u64,
    last_report: Option<LoadReport>,
}

/// In-memory store of CSV tables
#[derive(Debug)]
pub struct Store {
    resolver: Resolver,
    registry: RwLock<Arc<Registry>>,
    load_state: Mutex<LoadState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl Store {
    /// Create an empty store that resolves table files per `config`
    pub fn new(config: StoreConfig) -> Self {
        Self::with_resolver(Resolver::from_config(&config))
    }

    /// Create an empty store with an explicit resolver
    pub fn with_resolver(resolver: Resolver) -> Self {
        Self {
            resolver,
            registry: RwLock::new(Arc::new(Registry::new())),
            load_state: Mutex::new(LoadState::default()),
        }
    }

    pub fn resolver(&self) -> &Resolver {
        &self.resolver
    }

    /// Load the named tables, replacing everything previously loaded.
    ///
    /// Tables are read in order. The first missing or malformed table aborts
    /// the load; the remaining names are not read and the store is left with
    /// no tables at all, including the ones read before the failure.
    pub fn load<I, S>(&self, tables: I) -> Result<LoadReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut state = self.load_state.lock().unwrap_or_else(PoisonError::into_inner);
        state.generation += 1;
        state.last_report = None;

        match self.build_registry(tables) {
            Ok((registry, summaries)) => {
                self.swap_registry(registry);
                let report = LoadReport {
                    generation: state.generation,
                    loaded_at: Utc::now(),
                    tables: summaries,
                };
                tracing::info!(
                    generation = report.generation,
                    tables = report.tables.len(),
                    rows = report.total_rows(),
                    "tables loaded"
                );
                state.last_report = Some(report.clone());
                Ok(report)
            }
            Err(e) => {
                self.swap_registry(Registry::new());
                tracing::warn!(generation = state.generation, error = %e, "table load failed, store cleared");
                Err(e)
            }
        }
    }

    /// Load every table found in the search directories
    pub fn load_all(&self) -> Result<LoadReport> {
        let tables = self.available_tables()?;
        self.load(tables)
    }

    fn build_registry<I, S>(&self, tables: I) -> Result<(Registry, Vec<TableSummary>)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut registry = Registry::new();
        let mut summaries = Vec::new();

        for name in tables {
            let name = name.as_ref();
            let path = self.resolver.resolve(name)?;
            let table = parse_table(name, &path)?;
            tracing::info!(table = name, path = %path.display(), rows = table.len(), "loaded table");

            summaries.push(TableSummary {
                name: name.to_string(),
                path,
                rows: table.len(),
            });
            registry.insert(table);
        }

        Ok((registry, summaries))
    }

    fn swap_registry(&self, registry: Registry) {
        let mut guard = self.registry.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(registry);
    }

    /// The current registry. The snapshot stays valid across later loads.
    pub fn snapshot(&self) -> Arc<Registry> {
        self.registry
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Report of the most recent load, if it succeeded
    pub fn last_report(&self) -> Option<LoadReport> {
        self.load_state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last_report
            .clone()
    }

    /// Table names present in the search directories. When the same name is
    /// in several directories it is listed once.
    pub fn available_tables(&self) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        for dir in self.resolver.dirs() {
            names.extend(discover_tables(dir, self.resolver.suffix())?);
        }
        Ok(names.into_iter().collect())
    }

    /// Names of the loaded tables, sorted
    pub fn table_names(&self) -> Vec<String> {
        self.snapshot()
            .table_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.snapshot().contains_table(table)
    }

    /// See [`Registry::get_string`]
    pub fn get_string(
        &self,
        table: &str,
        query_field: &str,
        query_value: &str,
        result_field: &str,
    ) -> String {
        self.snapshot()
            .get_string(table, query_field, query_value, result_field)
    }

    /// See [`Registry::get_lines`]
    pub fn get_lines(&self, table: &str, queries: &[Query]) -> Vec<Arc<Row>> {
        self.snapshot().get_lines(table, queries)
    }

    /// See [`Registry::get_line`]
    pub fn get_line(&self, table: &str, queries: &[Query]) -> Option<Arc<Row>> {
        self.snapshot().get_line(table, queries)
    }

    /// See [`Registry::get_all`]
    pub fn get_all(&self, table: &str) -> Option<Vec<Arc<Row>>> {
        self.snapshot().get_all(table)
    }
}
