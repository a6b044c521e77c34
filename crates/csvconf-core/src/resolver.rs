//! Table name to file path resolution

use crate::config::{default_search_dirs, StoreConfig};
use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Maps table names onto files in an ordered list of directories
#[derive(Debug, Clone)]
pub struct Resolver {
    dirs: Vec<PathBuf>,
    config: StoreConfig,
}

impl Resolver {
    /// Build a resolver for a config. A configured prefix is the only
    /// location searched; otherwise the default directories are used.
    pub fn from_config(config: &StoreConfig) -> Self {
        let dirs = match config.prefix() {
            Some(prefix) => vec![prefix.to_path_buf()],
            None => default_search_dirs(),
        };
        Self {
            dirs,
            config: config.clone(),
        }
    }

    /// Build a resolver over explicit directories, searched in order
    pub fn with_dirs(dirs: Vec<PathBuf>, suffix: &str) -> Self {
        Self {
            dirs,
            config: StoreConfig::default().with_file_suffix(suffix),
        }
    }

    /// Directories searched, in order
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    pub fn suffix(&self) -> &str {
        self.config.suffix()
    }

    /// Candidate paths for a table, in search order
    pub fn candidates(&self, table: &str) -> Vec<PathBuf> {
        let file_name = self.config.file_name(table);
        self.dirs.iter().map(|dir| dir.join(&file_name)).collect()
    }

    /// Find the first existing file for `table`
    pub fn resolve(&self, table: &str) -> Result<PathBuf> {
        let candidates = self.candidates(table);
        for path in &candidates {
            tracing::debug!(table, path = %path.display(), "looking for table file");
            if is_file(path) {
                return Ok(path.clone());
            }
        }

        Err(Error::FileNotFound {
            table: table.to_string(),
            searched: candidates,
        })
    }
}

fn is_file(path: &Path) -> bool {
    path.metadata().map(|m| m.is_file()).unwrap_or(false)
}
