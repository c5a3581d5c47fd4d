//! Dataset-level column classification.

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;

use super::column::ColumnDescriptor;
use super::types::ColumnKind;

/// Column names bucketed by kind, each list in dataset order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
    pub all: Vec<String>,
    /// Full descriptor for every column.
    #[serde(skip)]
    pub descriptors: Vec<ColumnDescriptor>,
}

impl ColumnInfo {
    /// Descriptor for a column by name.
    pub fn get(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Kind of a column by name.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.get(name).map(|d| d.kind)
    }

    pub fn is_numeric(&self, name: &str) -> bool {
        self.kind_of(name) == Some(ColumnKind::Numeric)
    }

    pub fn is_categorical(&self, name: &str) -> bool {
        self.kind_of(name) == Some(ColumnKind::Categorical)
    }

    pub fn is_datetime(&self, name: &str) -> bool {
        self.kind_of(name) == Some(ColumnKind::Datetime)
    }
}

/// Classify every column of a dataset by its declared type.
///
/// Pure function of the schema; values are never sampled.
pub fn classify(dataset: &Dataset) -> ColumnInfo {
    let mut info = ColumnInfo::default();

    for (position, column) in dataset.columns().enumerate() {
        let descriptor = ColumnDescriptor::new(column.name(), position, column.data_type());
        let name = descriptor.name.clone();
        match descriptor.kind {
            ColumnKind::Numeric => info.numeric.push(name.clone()),
            ColumnKind::Categorical => info.categorical.push(name.clone()),
            ColumnKind::Datetime => info.datetime.push(name.clone()),
            ColumnKind::Other => {}
        }
        info.all.push(name);
        info.descriptors.push(descriptor);
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use chrono::NaiveDate;

    #[test]
    fn test_classify_buckets_columns() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ds = Dataset::new(vec![
            Column::text("name", ["a"]),
            Column::integer("age", [1]),
            Column::datetime("seen", [day]),
            Column::float("score", [0.5]),
            Column::boolean("active", [true]),
        ])
        .unwrap();

        let info = classify(&ds);
        assert_eq!(info.numeric, vec!["age", "score"]);
        assert_eq!(info.categorical, vec!["name"]);
        assert_eq!(info.datetime, vec!["seen"]);
        assert_eq!(info.all, vec!["name", "age", "seen", "score", "active"]);
        assert_eq!(info.kind_of("active"), Some(ColumnKind::Other));
        assert!(info.is_numeric("score"));
        assert!(info.kind_of("missing").is_none());
    }

    #[test]
    fn test_classify_empty_dataset() {
        let info = classify(&Dataset::default());
        assert!(info.all.is_empty());
    }
}
