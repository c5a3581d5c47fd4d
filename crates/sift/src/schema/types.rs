//! Core type definitions for column typing and classification.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Declared data type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Whole numbers.
    Integer,
    /// Floating-point numbers.
    Float,
    /// Boolean values (true/false).
    Boolean,
    /// Text/string values.
    Text,
    /// Date and/or time values.
    DateTime,
}

impl DataType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, DataType::Integer | DataType::Float)
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, DataType::DateTime)
    }

    /// Returns true if this type holds free text.
    pub fn is_textual(&self) -> bool {
        matches!(self, DataType::Text)
    }

    /// Short lowercase name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Integer => "integer",
            DataType::Float => "float",
            DataType::Boolean => "boolean",
            DataType::Text => "text",
            DataType::DateTime => "datetime",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Semantic kind of a column, deciding which filter logic applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or float columns.
    Numeric,
    /// Text columns.
    Categorical,
    /// Date/time columns.
    Datetime,
    /// Anything else (booleans).
    Other,
}

impl From<DataType> for ColumnKind {
    fn from(data_type: DataType) -> Self {
        match data_type {
            DataType::Integer | DataType::Float => ColumnKind::Numeric,
            DataType::Text => ColumnKind::Categorical,
            DataType::DateTime => ColumnKind::Datetime,
            DataType::Boolean => ColumnKind::Other,
        }
    }
}
