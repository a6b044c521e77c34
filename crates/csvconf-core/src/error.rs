//! Error types for csvconf-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in csvconf-core
#[derive(Debug, Error)]
pub enum Error {
    /// No file for the table in any search location
    #[error("file not found for table '{table}' (searched: {})", display_paths(.searched))]
    FileNotFound { table: String, searched: Vec<PathBuf> },

    /// The file exists but could not be opened
    #[error("failed to open '{path}' for table '{table}': {source}")]
    Open {
        table: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed table content
    #[error("failed to parse table '{table}' from '{path}': {message}")]
    Parse {
        table: String,
        path: PathBuf,
        message: String,
    },

    /// CSV parsing error from the csv crate
    #[error("CSV error in table '{table}' ('{path}'): {source}")]
    Csv {
        table: String,
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Failed to read a config file
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Predicate text without a `field=value` shape
    #[error("invalid query '{0}', expected 'field=value'")]
    InvalidQuery(String),

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Name of the table the error belongs to, for load failures
    pub fn table(&self) -> Option<&str> {
        match self {
            Error::FileNotFound { table, .. }
            | Error::Open { table, .. }
            | Error::Parse { table, .. }
            | Error::Csv { table, .. } => Some(table),
            _ => None,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    if paths.is_empty() {
        return "nothing".to_string();
    }
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_lists_searched_paths() {
        let err = Error::FileNotFound {
            table: "item".to_string(),
            searched: vec![PathBuf::from("/a/item.csv"), PathBuf::from("/b/item.csv")],
        };
        let msg = err.to_string();
        assert!(msg.contains("'item'"));
        assert!(msg.contains("/a/item.csv, /b/item.csv"));
        assert_eq!(err.table(), Some("item"));
    }

    #[test]
    fn test_invalid_query_has_no_table() {
        let err = Error::InvalidQuery("oops".to_string());
        assert_eq!(err.table(), None);
    }
}
