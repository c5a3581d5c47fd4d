//! Numeric range filter.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, SiftError};
use crate::predicate::Predicate;

use super::FilterStep;

/// Extent of a numeric column, shown before a range is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub min: f64,
    pub max: f64,
    pub unique_count: usize,
}

/// Inclusive range selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }
}

/// Min, max and distinct count over the non-null values of a numeric column.
pub fn numeric_summary(dataset: &Dataset, column: &str) -> Result<NumericSummary> {
    let col = dataset.require_column(column)?;
    if !col.data_type().is_numeric() {
        return Err(SiftError::Validation(format!(
            "column '{}' is {}, not numeric",
            column,
            col.data_type()
        )));
    }

    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut seen = HashSet::new();
    for x in col.values().iter().filter_map(|v| v.as_f64()) {
        min = min.min(x);
        max = max.max(x);
        // -0.0 and 0.0 are the same value
        seen.insert((x + 0.0).to_bits());
    }

    if seen.is_empty() {
        return Err(SiftError::EmptyData(format!(
            "column '{}' has no numeric values",
            column
        )));
    }

    Ok(NumericSummary {
        min,
        max,
        unique_count: seen.len(),
    })
}

/// Keep rows of `current` whose value lies in `range`, inclusive.
///
/// Bounds come from `original`. A range covering the full extent is a no-op, and an
/// inverted range is rejected rather than corrected.
pub fn apply_numeric(
    original: &Dataset,
    current: &Dataset,
    column: &str,
    range: NumericRange,
) -> Result<FilterStep> {
    if range.min.is_nan() || range.max.is_nan() {
        return Err(SiftError::Validation(format!(
            "range bounds for '{}' must be numbers",
            column
        )));
    }
    if range.min > range.max {
        return Err(SiftError::Validation(format!(
            "Minimum ({}) cannot be greater than maximum ({})",
            range.min, range.max
        )));
    }

    let summary = numeric_summary(original, column)?;
    // A range covering the whole extent excludes nothing.
    if range.min <= summary.min && range.max >= summary.max {
        return Ok(FilterStep::unchanged(current));
    }

    let predicate = Predicate::Between {
        column: column.to_string(),
        min: range.min,
        max: range.max,
    };
    let dataset = predicate.apply(current)?;
    Ok(FilterStep::applied(
        dataset,
        format!("{}: {} to {}", column, range.min, range.max),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn ages() -> Dataset {
        Dataset::new(vec![Column::integer("age", [18, 25, 40, 60])]).unwrap()
    }

    #[test]
    fn test_summary() {
        let s = numeric_summary(&ages(), "age").unwrap();
        assert_eq!((s.min, s.max, s.unique_count), (18.0, 60.0, 4));
    }

    #[test]
    fn test_sub_range_keeps_inclusive_bounds() {
        let ds = ages();
        let step = apply_numeric(&ds, &ds, "age", NumericRange::new(25.0, 40.0)).unwrap();
        assert!(step.applied);
        assert_eq!(step.dataset.row_count(), 2);
        assert_eq!(step.description.as_deref(), Some("age: 25 to 40"));
    }

    #[test]
    fn test_full_range_is_noop() {
        let ds = ages();
        let step = apply_numeric(&ds, &ds, "age", NumericRange::new(18.0, 60.0)).unwrap();
        assert!(!step.applied);
        assert_eq!(step.dataset.row_count(), 4);
        assert!(step.description.is_none());
    }

    #[test]
    fn test_wider_range_is_noop() {
        let ds = ages();
        let step = apply_numeric(&ds, &ds, "age", NumericRange::new(0.0, 100.0)).unwrap();
        assert!(!step.applied);
        assert_eq!(step.dataset.row_count(), 4);
        assert!(step.description.is_none());

        let step = apply_numeric(&ds, &ds, "age", NumericRange::new(18.0, 59.0)).unwrap();
        assert!(step.applied);
        assert_eq!(step.dataset.row_count(), 3);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let ds = ages();
        let err = apply_numeric(&ds, &ds, "age", NumericRange::new(40.0, 25.0)).unwrap_err();
        assert!(matches!(err, SiftError::Validation(_)));
    }

    #[test]
    fn test_empty_column_has_no_bounds() {
        let ds = Dataset::new(vec![Column::integer("age", [])]).unwrap();
        assert!(matches!(
            numeric_summary(&ds, "age"),
            Err(SiftError::EmptyData(_))
        ));
    }

    #[test]
    fn test_rejects_text_column() {
        let ds = Dataset::new(vec![Column::text("city", ["NY"])]).unwrap();
        assert!(numeric_summary(&ds, "city").is_err());
    }
}
