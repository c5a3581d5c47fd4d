//! Error types for the Sift library.

use std::path::PathBuf;
use thiserror::Error;

use crate::session::IssueKind;

/// Main error type for Sift operations.
#[derive(Debug, Error)]
pub enum SiftError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Empty file or no data to work with.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A referenced column does not exist in the dataset.
    #[error("Column '{0}' not found")]
    ColumnNotFound(String),

    /// A referenced dataset does not exist in the pool.
    #[error("Dataset '{0}' not found")]
    DatasetNotFound(String),

    /// Two columns share a name.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Columns of a dataset have different lengths.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// User input rejected before a filter is applied.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Join key types cannot be reconciled.
    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    /// A predicate could not be evaluated against the data.
    #[error("Evaluation error: {0}")]
    Evaluation(String),

    /// An operation was requested without its structural preconditions.
    #[error("{0}")]
    Precondition(String),

    /// The relational merge itself failed.
    #[error("Merge error: {0}")]
    Merge(String),
}

impl SiftError {
    /// Classify the error for user-facing reporting.
    pub fn issue_kind(&self) -> IssueKind {
        match self {
            SiftError::TypeMismatch(_) => IssueKind::TypeIncompatibility,
            SiftError::Evaluation(_) | SiftError::Merge(_) => IssueKind::Evaluation,
            SiftError::Precondition(_)
            | SiftError::EmptyData(_)
            | SiftError::DatasetNotFound(_) => IssueKind::Precondition,
            _ => IssueKind::Validation,
        }
    }
}

/// Result type alias for Sift operations.
pub type Result<T> = std::result::Result<T, SiftError>;
