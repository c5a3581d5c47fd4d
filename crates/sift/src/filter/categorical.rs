//! Categorical membership and text search filter.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{Result, SiftError};
use crate::predicate::{ConditionValue, Operator, Predicate};

use super::FilterStep;

/// What the user may pick from for a categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CategoricalChoices {
    /// Few enough distinct values to choose a subset, in first-seen order.
    Values { values: Vec<String> },
    /// Too many distinct values; only substring search is offered.
    Search { distinct: usize },
}

/// The user's categorical selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalSelection {
    /// Keep rows whose value is one of these.
    Values(Vec<String>),
    /// Keep rows whose value contains this term, ignoring case.
    Search(String),
}

/// Distinct non-null values of a text column, in first-seen order.
pub fn distinct_values(dataset: &Dataset, column: &str) -> Result<IndexSet<String>> {
    let col = dataset.require_column(column)?;
    if !col.data_type().is_textual() {
        return Err(SiftError::Validation(format!(
            "column '{}' is {}, not categorical",
            column,
            col.data_type()
        )));
    }
    Ok(col
        .values()
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| v.to_string())
        .collect())
}

/// Choices offered for a categorical column given the distinct-value threshold.
pub fn categorical_choices(
    dataset: &Dataset,
    column: &str,
    threshold: usize,
) -> Result<CategoricalChoices> {
    let distinct = distinct_values(dataset, column)?;
    if distinct.len() <= threshold {
        Ok(CategoricalChoices::Values {
            values: distinct.into_iter().collect(),
        })
    } else {
        Ok(CategoricalChoices::Search {
            distinct: distinct.len(),
        })
    }
}

/// Apply a categorical selection to `current`, with choices computed from `original`.
///
/// Selecting every distinct value, or searching for an empty term, is a no-op.
pub fn apply_categorical(
    original: &Dataset,
    current: &Dataset,
    column: &str,
    selection: &CategoricalSelection,
    threshold: usize,
) -> Result<FilterStep> {
    let distinct = distinct_values(original, column)?;
    let subset_mode = distinct.len() <= threshold;

    match selection {
        CategoricalSelection::Values(selected) => {
            if !subset_mode {
                return Err(SiftError::Validation(format!(
                    "column '{}' has {} distinct values (more than {}); use a search term",
                    column,
                    distinct.len(),
                    threshold
                )));
            }

            // Only values that actually occur count towards the selection.
            let chosen: IndexSet<&String> =
                selected.iter().filter(|v| distinct.contains(*v)).collect();
            if chosen.len() == distinct.len() {
                return Ok(FilterStep::unchanged(current));
            }

            let predicate = Predicate::InSet {
                column: column.to_string(),
                values: chosen.iter().map(|v| v.to_string()).collect(),
            };
            let dataset = predicate.apply(current)?;
            Ok(FilterStep::applied(
                dataset,
                format!("{}: {}/{} values", column, chosen.len(), distinct.len()),
            ))
        }
        CategoricalSelection::Search(term) => {
            if subset_mode {
                return Err(SiftError::Validation(format!(
                    "column '{}' has only {} distinct values; select values instead of searching",
                    column,
                    distinct.len()
                )));
            }
            if term.is_empty() {
                return Ok(FilterStep::unchanged(current));
            }

            let predicate = Predicate::compare(
                column,
                Operator::Contains,
                ConditionValue::Text(term.clone()),
            );
            let dataset = predicate.apply(current)?;
            Ok(FilterStep::applied(
                dataset,
                format!("{}: contains '{}'", column, term),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;

    fn cities() -> Dataset {
        Dataset::new(vec![Column::text("city", ["NY", "LA", "SF", "NY"])]).unwrap()
    }

    fn many_names() -> Dataset {
        let names: Vec<String> = (0..60).map(|i| format!("Name{:02}", i)).collect();
        Dataset::new(vec![Column::text("name", names)]).unwrap()
    }

    #[test]
    fn test_choices_in_first_seen_order() {
        let choices = categorical_choices(&cities(), "city", 50).unwrap();
        assert_eq!(
            choices,
            CategoricalChoices::Values {
                values: vec!["NY".into(), "LA".into(), "SF".into()]
            }
        );
        assert_eq!(
            categorical_choices(&many_names(), "name", 50).unwrap(),
            CategoricalChoices::Search { distinct: 60 }
        );
    }

    #[test]
    fn test_subset_selection() {
        let ds = cities();
        let sel = CategoricalSelection::Values(vec!["NY".into()]);
        let step = apply_categorical(&ds, &ds, "city", &sel, 50).unwrap();
        assert!(step.applied);
        assert_eq!(step.dataset.row_count(), 2);
        assert_eq!(step.description.as_deref(), Some("city: 1/3 values"));
    }

    #[test]
    fn test_full_selection_is_noop() {
        let ds = cities();
        let sel = CategoricalSelection::Values(vec!["SF".into(), "NY".into(), "LA".into()]);
        let step = apply_categorical(&ds, &ds, "city", &sel, 50).unwrap();
        assert!(!step.applied);
        assert_eq!(step.dataset.row_count(), 4);
    }

    #[test]
    fn test_search_mode() {
        let ds = many_names();
        let empty = CategoricalSelection::Search(String::new());
        assert!(!apply_categorical(&ds, &ds, "name", &empty, 50).unwrap().applied);

        let term = CategoricalSelection::Search("name0".into());
        let step = apply_categorical(&ds, &ds, "name", &term, 50).unwrap();
        assert!(step.applied);
        assert_eq!(step.dataset.row_count(), 10);
        assert_eq!(step.description.as_deref(), Some("name: contains 'name0'"));
    }

    #[test]
    fn test_mode_mismatch_rejected() {
        let ds = cities();
        let sel = CategoricalSelection::Search("N".into());
        assert!(matches!(
            apply_categorical(&ds, &ds, "city", &sel, 50),
            Err(SiftError::Validation(_))
        ));
    }
}
