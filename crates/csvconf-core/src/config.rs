//! Store configuration: where table files live and how they are named

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Suffix appended to table names when none is configured
pub const DEFAULT_SUFFIX: &str = ".csv";

/// Name of the directory searched next to the executable and the working directory
pub const DEFAULT_DIR_NAME: &str = "csv";

/// Options recognized by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Directory holding the table files. When set, the default search
    /// directories are not consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<PathBuf>,
    /// Appended verbatim to a table name to form its file name
    #[serde(default = "default_suffix")]
    pub file_suffix: String,
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path_prefix: None,
            file_suffix: default_suffix(),
        }
    }
}

impl StoreConfig {
    /// Build a config where an empty prefix means "use the default search
    /// directories" and an empty suffix means `.csv`.
    pub fn new(path_prefix: impl AsRef<Path>, file_suffix: &str) -> Self {
        let mut config = Self::default();
        config.set_path_prefix(path_prefix);
        config.set_file_suffix(file_suffix);
        config
    }

    pub fn with_path_prefix(mut self, path_prefix: impl AsRef<Path>) -> Self {
        self.set_path_prefix(path_prefix);
        self
    }

    pub fn with_file_suffix(mut self, file_suffix: &str) -> Self {
        self.set_file_suffix(file_suffix);
        self
    }

    fn set_path_prefix(&mut self, path_prefix: impl AsRef<Path>) {
        let prefix = path_prefix.as_ref();
        self.path_prefix = if prefix.as_os_str().is_empty() {
            None
        } else {
            Some(prefix.to_path_buf())
        };
    }

    fn set_file_suffix(&mut self, file_suffix: &str) {
        self.file_suffix = if file_suffix.is_empty() {
            default_suffix()
        } else {
            file_suffix.to_string()
        };
    }

    /// Directory to search, if one is configured. An empty prefix counts as
    /// none, however the config was built.
    pub fn prefix(&self) -> Option<&Path> {
        self.path_prefix
            .as_deref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Suffix in effect; `.csv` when the configured one is empty
    pub fn suffix(&self) -> &str {
        if self.file_suffix.is_empty() {
            DEFAULT_SUFFIX
        } else {
            &self.file_suffix
        }
    }

    /// File name for a table, e.g. `item` -> `item.csv`
    pub fn file_name(&self, table: &str) -> String {
        format!("{}{}", table, self.suffix())
    }

    /// Load a config from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::ConfigRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        let mut config: Self = serde_json::from_str(&content)?;
        // Normalize empty strings the same way `new` does
        if let Some(prefix) = config.path_prefix.take() {
            config.set_path_prefix(prefix);
        }
        let suffix = std::mem::take(&mut config.file_suffix);
        config.set_file_suffix(&suffix);
        Ok(config)
    }

    /// Save the config as JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

/// Default search directories, in order: `<exe dir>/csv`, then `<cwd>/csv`.
///
/// A location that cannot be determined is skipped.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::with_capacity(2);
    if let Some(exe_dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir.join(DEFAULT_DIR_NAME));
    }
    if let Ok(cwd) = std::env::current_dir() {
        dirs.push(cwd.join(DEFAULT_DIR_NAME));
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path_prefix, None);
        assert_eq!(config.file_suffix, ".csv");
        assert_eq!(config.file_name("item"), "item.csv");
    }

    #[test]
    fn test_new_treats_empty_as_default() {
        let config = StoreConfig::new("", "");
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_new_keeps_suffix_verbatim() {
        let config = StoreConfig::new("/data", ".txt");
        assert_eq!(config.path_prefix, Some(PathBuf::from("/data")));
        assert_eq!(config.file_name("skill"), "skill.txt");
    }

    #[test]
    fn test_load_json_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csvconf.json");
        fs::write(&path, r#"{ "path_prefix": "/srv/tables" }"#).unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.path_prefix, Some(PathBuf::from("/srv/tables")));
        assert_eq!(config.file_suffix, ".csv");
    }

    #[test]
    fn test_load_normalizes_empty_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csvconf.json");
        fs::write(&path, r#"{ "path_prefix": "", "file_suffix": "" }"#).unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("csvconf.json");
        let config = StoreConfig::new("/x", ".tsv");
        config.save(&path).unwrap();
        assert_eq!(StoreConfig::load(&path).unwrap(), config);
    }

    #[test]
    fn test_load_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = StoreConfig::load(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigRead { .. }));
    }

    #[test]
    fn test_literal_config_falls_back_to_defaults() {
        let config = StoreConfig {
            path_prefix: Some(PathBuf::new()),
            file_suffix: String::new(),
        };
        assert_eq!(config.prefix(), None);
        assert_eq!(config.suffix(), ".csv");
        assert_eq!(config.file_name("item"), "item.csv");
    }

    #[test]
    fn test_default_search_dirs_exe_dir_first() {
        let exe_dir = std::env::current_exe()
            .unwrap()
            .parent()
            .unwrap()
            .join(DEFAULT_DIR_NAME);
        let cwd_dir = std::env::current_dir().unwrap().join(DEFAULT_DIR_NAME);

        let dirs = default_search_dirs();
        assert_eq!(dirs, vec![exe_dir, cwd_dir]);
    }
}
