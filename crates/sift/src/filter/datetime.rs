//! Date range filter.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, SiftError};
use crate::predicate::Predicate;

use super::FilterStep;

/// Inclusive date range selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }
}

/// Earliest and latest date in a datetime column.
pub fn datetime_bounds(dataset: &Dataset, column: &str) -> Result<DateRange> {
    let col = dataset.require_column(column)?;
    if !col.data_type().is_temporal() {
        return Err(SiftError::Validation(format!(
            "column '{}' is {}, not a date/time",
            column,
            col.data_type()
        )));
    }

    let mut dates = col.values().iter().filter_map(|v| v.as_datetime());
    let first = dates.next().ok_or_else(|| {
        SiftError::EmptyData(format!("column '{}' has no date values", column))
    })?;
    let (min, max) = dates.fold((first, first), |(lo, hi), dt| (lo.min(dt), hi.max(dt)));

    Ok(DateRange::new(min.date(), max.date()))
}

/// Keep rows of `current` whose date component lies in `range`, inclusive.
///
/// A range covering every date of `original` is a no-op.
/// A start after the end is not rejected; it simply matches nothing.
pub fn apply_datetime(
    original: &Dataset,
    current: &Dataset,
    column: &str,
    range: DateRange,
) -> Result<FilterStep> {
    let bounds = datetime_bounds(original, column)?;
    if range.start <= bounds.start && range.end >= bounds.end {
        return Ok(FilterStep::unchanged(current));
    }

    let predicate = Predicate::DateBetween {
        column: column.to_string(),
        start: range.start,
        end: range.end,
    };
    let dataset = predicate.apply(current)?;
    Ok(FilterStep::applied(
        dataset,
        format!("{}: {} to {}", column, range.start, range.end),
    ))
}
