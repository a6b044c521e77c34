//! CSV parser for configuration tables

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Parse a CSV file into a Table named `name`
pub fn parse_table<P: AsRef<Path>>(name: &str, path: P) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::Open {
        table: name.to_string(),
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_table_reader(name, path.to_path_buf(), BufReader::new(file))
}

/// Parse CSV from a string (useful for testing)
pub fn parse_table_str(name: &str, content: &str) -> Result<Table> {
    parse_table_reader(name, PathBuf::from(name), content.as_bytes())
}

/// Parse CSV from any reader. The first record is the header; every later
/// record becomes one Row.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD rather than
/// failing the table.
pub fn parse_table_reader<R: Read>(name: &str, path: PathBuf, reader: R) -> Result<Table> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Records may be shorter or longer than the header
        .from_reader(reader);

    let csv_err = |e: csv::Error, path: &Path| Error::Csv {
        table: name.to_string(),
        path: path.to_path_buf(),
        source: e,
    };

    let headers: Vec<String> = csv_reader
        .byte_headers()
        .map_err(|e| csv_err(e, path.as_path()))?
        .iter()
        .map(|h| String::from_utf8_lossy(h).into_owned())
        .collect();

    if headers.is_empty() {
        return Err(Error::Parse {
            table: name.to_string(),
            path,
            message: "no header line found".to_string(),
        });
    }

    let mut table = Table::new(name, path);
    for (row_idx, result) in csv_reader.byte_records().enumerate() {
        let record = result.map_err(|e| csv_err(e, table.source_path.as_path()))?;

        if record.len() > headers.len() {
            tracing::warn!(
                table = name,
                row = row_idx + 1,
                fields = record.len(),
                columns = headers.len(),
                "record has more fields than header, ignoring extras"
            );
        }

        let row = Row::from_record(
            headers.iter().map(String::as_str),
            record.iter().map(String::from_utf8_lossy),
        );
        table.rows.push(Arc::new(row));
    }
    table.headers = headers;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "id,name,value\n1,foo,100\n2,bar,200\n";
        let table = parse_table_str("items", csv).unwrap();

        assert_eq!(table.name, "items");
        assert_eq!(table.headers(), ["id", "name", "value"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("name"), Some("foo"));
        assert_eq!(table.rows[1].get("value"), Some("200"));
    }

    #[test]
    fn test_parse_header_only() {
        let table = parse_table_str("empty", "id,name\n").unwrap();
        assert_eq!(table.headers().len(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_empty_content_is_error() {
        let err = parse_table_str("empty", "").unwrap_err();
        assert!(matches!(err, Error::Parse { ref table, .. } if table == "empty"));
    }

    #[test]
    fn test_parse_quoted_fields() {
        let csv = "id,desc\n1,\"a, b\"\n2,\"say \"\"hi\"\"\"\n";
        let table = parse_table_str("q", csv).unwrap();
        assert_eq!(table.rows[0].get("desc"), Some("a, b"));
        assert_eq!(table.rows[1].get("desc"), Some("say \"hi\""));
    }

    #[test]
    fn test_parse_values_are_not_trimmed() {
        let table = parse_table_str("t", "id,name\n1, spaced \n").unwrap();
        assert_eq!(table.rows[0].get("name"), Some(" spaced "));
    }

    #[test]
    fn test_parse_short_record() {
        let table = parse_table_str("t", "id,name,desc\n1,foo\n").unwrap();
        assert_eq!(table.rows[0].get("name"), Some("foo"));
        assert_eq!(table.rows[0].get("desc"), None);
    }

    #[test]
    fn test_parse_long_record() {
        let table = parse_table_str("t", "id\n1,2,3\n").unwrap();
        assert_eq!(table.rows[0].len(), 1);
        assert_eq!(table.rows[0].get("id"), Some("1"));
    }

    #[test]
    fn test_parse_duplicate_headers() {
        let table = parse_table_str("t", "id,val,val\n1,a,b\n").unwrap();
        assert_eq!(table.rows[0].get("val"), Some("b"));
        assert_eq!(table.headers(), ["id", "val", "val"]);
    }

    #[test]
    fn test_parse_non_utf8_bytes_are_replaced() {
        // "name" cell holds GBK-encoded text
        let content: &[u8] = b"id,name\n1,\xb5\xc0\xbe\xdf\n2,plain\n";
        let table = parse_table_reader("legacy", PathBuf::from("legacy.csv"), content).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].get("id"), Some("1"));
        assert!(table.rows[0].get("name").unwrap().contains('\u{FFFD}'));
        assert_eq!(table.rows[1].get("name"), Some("plain"));
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "a,b\nx,y\n").unwrap();

        let table = parse_table("pair", file.path()).unwrap();
        assert_eq!(table.source_path, file.path());
        assert_eq!(table.rows[0].get("b"), Some("y"));
    }

    #[test]
    fn test_parse_missing_file_is_open_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = parse_table("gone", dir.path().join("gone.csv")).unwrap_err();
        assert!(matches!(err, Error::Open { .. }));
    }
}
