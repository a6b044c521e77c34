//! csvconf-core: Load CSV configuration tables and query them by field
//!
//! This library provides functionality to:
//! - Resolve table names to CSV files under a prefix or default search dirs
//! - Parse CSV files into header-keyed rows
//! - Hold the loaded tables in a store that is replaced wholesale on reload
//! - Look up rows by field/value equality predicates
//!
//! ```no_run
//! use csvconf_core::{Query, Store, StoreConfig};
//!
//! let store = Store::new(StoreConfig::new("data/csv", ""));
//! store.load(["item", "skill"])?;
//!
//! let name = store.get_string("item", "id", "1001", "name");
//! let weapons = store.get_lines("item", &[Query::new("kind", "weapon")]);
//! # let _ = (name, weapons);
//! # Ok::<(), csvconf_core::Error>(())
//! ```

pub mod config;
pub mod discovery;
pub mod error;
pub mod parser;
pub mod query;
pub mod registry;
pub mod resolver;
pub mod store;
pub mod table;

pub use config::StoreConfig;
pub use discovery::discover_tables;
pub use error::{Error, Result};
pub use parser::{parse_table, parse_table_str};
pub use query::Query;
pub use registry::Registry;
pub use resolver::Resolver;
pub use store::{LoadReport, Store, TableSummary};
pub use table::{Row, Table};
