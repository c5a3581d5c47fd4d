//! Predicate builders for the simple (per-column) filters.
//!
//! Each builder reads bounds or choices from the original dataset and applies
//! its predicate to the dataset accumulated so far.

mod categorical;
mod datetime;
mod numeric;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SiftError};
use crate::schema::ColumnKind;

pub use categorical::{
    apply_categorical, categorical_choices, distinct_values, CategoricalChoices,
    CategoricalSelection,
};
pub use datetime::{apply_datetime, datetime_bounds, DateRange};
pub use numeric::{apply_numeric, numeric_summary, NumericRange, NumericSummary};

/// Result of a single predicate builder.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStep {
    /// Dataset after this step.
    pub dataset: Dataset,
    /// Whether the step filtered anything.
    pub applied: bool,
    /// Provenance line, present when applied.
    pub description: Option<String>,
}

impl FilterStep {
    /// A step that leaves `current` as it is.
    pub fn unchanged(current: &Dataset) -> Self {
        Self {
            dataset: current.clone(),
            applied: false,
            description: None,
        }
    }

    pub fn applied(dataset: Dataset, description: String) -> Self {
        Self {
            dataset,
            applied: true,
            description: Some(description),
        }
    }
}

/// User parameters for one column of the simple filter panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SimpleFilter {
    Numeric { column: String, range: NumericRange },
    Categorical {
        column: String,
        selection: CategoricalSelection,
    },
    Datetime { column: String, range: DateRange },
}

impl SimpleFilter {
    pub fn numeric(column: impl Into<String>, min: f64, max: f64) -> Self {
        SimpleFilter::Numeric {
            column: column.into(),
            range: NumericRange::new(min, max),
        }
    }

    pub fn values<S: Into<String>>(
        column: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        SimpleFilter::Categorical {
            column: column.into(),
            selection: CategoricalSelection::Values(values.into_iter().map(Into::into).collect()),
        }
    }

    pub fn search(column: impl Into<String>, term: impl Into<String>) -> Self {
        SimpleFilter::Categorical {
            column: column.into(),
            selection: CategoricalSelection::Search(term.into()),
        }
    }

    pub fn dates(column: impl Into<String>, range: DateRange) -> Self {
        SimpleFilter::Datetime {
            column: column.into(),
            range,
        }
    }

    /// Column this filter targets.
    pub fn column(&self) -> &str {
        match self {
            SimpleFilter::Numeric { column, .. }
            | SimpleFilter::Categorical { column, .. }
            | SimpleFilter::Datetime { column, .. } => column,
        }
    }

    /// Kind of column this filter expects.
    pub fn kind(&self) -> ColumnKind {
        match self {
            SimpleFilter::Numeric { .. } => ColumnKind::Numeric,
            SimpleFilter::Categorical { .. } => ColumnKind::Categorical,
            SimpleFilter::Datetime { .. } => ColumnKind::Datetime,
        }
    }

    /// Run the matching predicate builder.
    pub fn apply(
        &self,
        original: &Dataset,
        current: &Dataset,
        config: &FilterConfig,
    ) -> Result<FilterStep> {
        let column = original.require_column(self.column())?;
        let actual = ColumnKind::from(column.data_type());
        if actual != self.kind() {
            return Err(SiftError::Validation(format!(
                "column '{}' is {}; a {:?} filter does not apply",
                self.column(),
                column.data_type(),
                self.kind()
            )));
        }

        match self {
            SimpleFilter::Numeric { column, range } => {
                apply_numeric(original, current, column, *range)
            }
            SimpleFilter::Categorical { column, selection } => apply_categorical(
                original,
                current,
                column,
                selection,
                config.categorical_threshold,
            ),
            SimpleFilter::Datetime { column, range } => {
                apply_datetime(original, current, column, *range)
            }
        }
    }
}
