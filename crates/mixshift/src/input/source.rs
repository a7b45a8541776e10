//! Parsed tables and the provenance of the file they came from.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Cell spellings treated as missing, compared case-insensitively after trimming.
const NULL_SPELLINGS: &[&str] = &["", "na", "n/a", "null", "none", "nil", "nan", ".", "-"];

/// Provenance of an input file, carried into exported results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without directories.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:` followed by the hex digest of the raw bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// Short name of the dialect: `csv`, `tsv`, `csv-semicolon`, `psv`.
    pub format: String,
    /// `utf-8-sig` when the file starts with a byte order mark.
    pub encoding: String,
    pub row_count: usize,
    pub column_count: usize,
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `contents`, read from `path` and parsed into `table`.
    pub fn describe(path: &Path, contents: &[u8], table: &DataTable) -> Self {
        let digest = Sha256::digest(contents);
        let encoding = if contents.starts_with(b"\xEF\xBB\xBF") {
            "utf-8-sig"
        } else {
            "utf-8"
        };

        Self {
            file: path
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: path.to_path_buf(),
            hash: format!("sha256:{:x}", digest),
            size_bytes: contents.len() as u64,
            format: format_name(table.delimiter).to_string(),
            encoding: encoding.to_string(),
            row_count: table.row_count(),
            column_count: table.column_count(),
            read_at: Utc::now(),
        }
    }
}

/// Dialect name for a delimiter byte.
pub fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

/// Raw string cells with a header, every row as wide as the header.
#[derive(Debug, Clone)]
pub struct DataTable {
    pub headers: Vec<String>,
    /// Row-major cells.
    pub rows: Vec<Vec<String>>,
    pub delimiter: u8,
}

impl DataTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>, delimiter: u8) -> Self {
        Self {
            headers,
            rows,
            delimiter,
        }
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cells of one column, top to bottom.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map_or("", String::as_str))
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Whether a cell is one of the recognised missing-value spellings.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        NULL_SPELLINGS
            .iter()
            .any(|null| trimmed.eq_ignore_ascii_case(null))
    }
}
