//! Column descriptors.

use serde::{Deserialize, Serialize};

use super::types::{ColumnKind, DataType};

/// Name, position and classification of a single column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,
    /// Zero-based position in the dataset.
    pub position: usize,
    /// Declared data type.
    pub data_type: DataType,
    /// Filter kind derived from the data type.
    pub kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Describe a column from its declared type.
    pub fn new(name: impl Into<String>, position: usize, data_type: DataType) -> Self {
        Self {
            name: name.into(),
            position,
            data_type,
            kind: ColumnKind::from(data_type),
        }
    }
}
