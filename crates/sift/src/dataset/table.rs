//! In-memory table of named, typed columns.

use std::io::Write;

use indexmap::IndexMap;

use crate::error::{Result, SiftError};

use super::column::Column;

/// An ordered set of equally long columns with unique names.
///
/// Datasets are values: every filter or join produces a new one and never
/// mutates its input.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    columns: IndexMap<String, Column>,
    rows: usize,
}

impl Dataset {
    /// Build a dataset, rejecting duplicate names and ragged columns.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map_or(0, Column::len);
        let mut map = IndexMap::with_capacity(columns.len());

        for column in columns {
            if column.len() != rows {
                return Err(SiftError::LengthMismatch {
                    column: column.name().to_string(),
                    expected: rows,
                    actual: column.len(),
                });
            }
            let name = column.name().to_string();
            if map.contains_key(&name) {
                return Err(SiftError::DuplicateColumn(name));
            }
            map.insert(name, column);
        }

        Ok(Self { columns: map, rows })
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// True when the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Look up a column, failing with `ColumnNotFound`.
    pub fn require_column(&self, name: &str) -> Result<&Column> {
        self.column(name)
            .ok_or_else(|| SiftError::ColumnNotFound(name.to_string()))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Columns in dataset order.
    pub fn columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values()
    }

    /// Column names in dataset order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Rows whose mask entry is true, as a new dataset.
    pub fn filter(&self, mask: &[bool]) -> Dataset {
        let rows = mask.iter().take(self.rows).filter(|keep| **keep).count();
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), col.filter(mask)))
            .collect();
        Dataset { columns, rows }
    }

    /// Gather rows by index; `None` yields a row of nulls.
    pub fn take(&self, indices: &[Option<usize>]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|(name, col)| (name.clone(), col.take(indices)))
            .collect();
        Dataset {
            columns,
            rows: indices.len(),
        }
    }

    /// Replace a column with a same-length column of the same name.
    pub fn replace_column(&mut self, column: Column) -> Result<()> {
        if column.len() != self.rows {
            return Err(SiftError::LengthMismatch {
                column: column.name().to_string(),
                expected: self.rows,
                actual: column.len(),
            });
        }
        let slot = self
            .columns
            .get_mut(column.name())
            .ok_or_else(|| SiftError::ColumnNotFound(column.name().to_string()))?;
        *slot = column;
        Ok(())
    }

    /// Write the dataset as delimited text with a header row.
    pub fn write_csv<W: Write>(&self, writer: W, delimiter: u8) -> Result<()> {
        let mut out = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);

        out.write_record(self.columns.keys())?;
        for row in 0..self.rows {
            let record: Vec<String> = self
                .columns
                .values()
                .map(|col| col.get(row).map(|v| v.to_string()).unwrap_or_default())
                .collect();
            out.write_record(&record)?;
        }
        out.flush().map_err(|e| SiftError::Io {
            path: "<output>".into(),
            source: e,
        })?;
        Ok(())
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns.iter().eq(other.columns.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn people() -> Dataset {
        Dataset::new(vec![
            Column::integer("age", [18, 25, 40]),
            Column::text("city", ["NY", "LA", "SF"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = Dataset::new(vec![
            Column::integer("a", [1]),
            Column::integer("a", [2]),
        ]);
        assert!(matches!(result, Err(SiftError::DuplicateColumn(_))));
    }

    #[test]
    fn test_rejects_ragged_columns() {
        let result = Dataset::new(vec![
            Column::integer("a", [1, 2]),
            Column::integer("b", [2]),
        ]);
        assert!(matches!(result, Err(SiftError::LengthMismatch { .. })));
    }

    #[test]
    fn test_filter_keeps_alignment() {
        let ds = people().filter(&[false, true, true]);
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column("city").unwrap().get(0), Some(&Value::from("LA")));
        assert_eq!(ds.column("age").unwrap().get(1), Some(&Value::Int(40)));
    }

    #[test]
    fn test_column_order_matters_for_equality() {
        let a = people();
        let b = Dataset::new(vec![
            Column::text("city", ["NY", "LA", "SF"]),
            Column::integer("age", [18, 25, 40]),
        ])
        .unwrap();
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_write_csv() {
        let mut buf = Vec::new();
        people().write_csv(&mut buf, b',').unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "age,city\n18,NY\n25,LA\n40,SF\n");
    }
}
