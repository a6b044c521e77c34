//! Directory scanner for discovering loadable tables

use crate::error::Result;
use std::collections::BTreeSet;
use std::path::Path;
use walkdir::WalkDir;

/// List the table names available in `dir`: every file directly inside it
/// whose name ends with `suffix`, with the suffix stripped. Sorted.
///
/// A directory that does not exist holds no tables.
pub fn discover_tables<P: AsRef<Path>>(dir: P, suffix: &str) -> Result<Vec<String>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = BTreeSet::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(file_name) = entry.file_name().to_str() else {
            continue;
        };
        if let Some(table) = file_name.strip_suffix(suffix) {
            if !table.is_empty() {
                names.insert(table.to_string());
            }
        }
    }

    Ok(names.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_discover_tables_sorted() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("skill.csv"), "id\n").unwrap();
        fs::write(dir.path().join("item.csv"), "id\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "hello").unwrap();

        let names = discover_tables(dir.path(), ".csv").unwrap();
        assert_eq!(names, vec!["item", "skill"]);
    }

    #[test]
    fn test_discover_is_not_recursive() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("deep.csv"), "id\n").unwrap();
        fs::write(dir.path().join("top.csv"), "id\n").unwrap();

        let names = discover_tables(dir.path(), ".csv").unwrap();
        assert_eq!(names, vec!["top"]);
    }

    #[test]
    fn test_discover_ignores_bare_suffix() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".csv"), "id\n").unwrap();

        assert!(discover_tables(dir.path(), ".csv").unwrap().is_empty());
    }

    #[test]
    fn test_discover_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let names = discover_tables(dir.path().join("absent"), ".csv").unwrap();
        assert!(names.is_empty());
    }
}
