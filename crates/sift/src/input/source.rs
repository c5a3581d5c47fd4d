//! Where a dataset came from.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::dataset::Dataset;

/// Provenance of a dataset loaded from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Dataset name used in a pool; the file stem.
    pub name: String,
    pub path: PathBuf,
    /// `sha256:<hex>` of the raw file contents.
    pub hash: String,
    pub size_bytes: u64,
    pub delimiter: char,
    /// csv, tsv, csv-semicolon, psv or delimited.
    pub format: String,
    pub row_count: usize,
    pub column_count: usize,
    /// Cells parsed as missing.
    pub null_cells: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe `dataset`, parsed from `contents` read at `path`.
    pub fn describe(path: &Path, contents: &[u8], delimiter: u8, dataset: &Dataset) -> Self {
        let name = path
            .file_stem()
            .or_else(|| path.file_name())
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            name,
            path: path.to_path_buf(),
            hash: content_hash(contents),
            size_bytes: contents.len() as u64,
            delimiter: delimiter as char,
            format: format_name(delimiter).to_string(),
            row_count: dataset.row_count(),
            column_count: dataset.column_count(),
            null_cells: dataset.columns().map(|c| c.null_count()).sum(),
            loaded_at: Utc::now(),
        }
    }

    /// One-line summary, e.g. `orders.csv: 120 rows x 4 columns (csv, 3 missing)`.
    pub fn summary(&self) -> String {
        let file = self
            .path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone());
        format!(
            "{}: {} rows x {} columns ({}, {} missing)",
            file, self.row_count, self.column_count, self.format, self.null_cells
        )
    }
}

fn content_hash(contents: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(contents);
    format!("sha256:{:x}", hasher.finalize())
}

fn format_name(delimiter: u8) -> &'static str {
    match delimiter {
        b'\t' => "tsv",
        b',' => "csv",
        b';' => "csv-semicolon",
        b'|' => "psv",
        _ => "delimited",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Value};
    use crate::schema::DataType;

    #[test]
    fn test_describe() {
        let ds = Dataset::new(vec![Column::new(
            "x",
            DataType::Integer,
            vec![Value::Int(1), Value::Null],
        )])
        .unwrap();
        let meta = SourceMetadata::describe(Path::new("/tmp/orders.tsv"), b"x\n1\n\n", b'\t', &ds);

        assert_eq!(meta.name, "orders");
        assert_eq!(meta.format, "tsv");
        assert_eq!(meta.delimiter, '\t');
        assert_eq!(meta.null_cells, 1);
        assert_eq!(meta.size_bytes, 6);
        assert!(meta.hash.starts_with("sha256:"));
        assert_eq!(meta.summary(), "orders.tsv: 2 rows x 1 columns (tsv, 1 missing)");
    }
}
