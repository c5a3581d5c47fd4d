//! Filter session: owns the baseline dataset, the current filtered view and
//! the provenance of whatever produced it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::dataset::Dataset;
use crate::error::{Result, SiftError};
use crate::filter::SimpleFilter;
use crate::join::{self, DatasetPool, JoinReport, JoinSpec};
use crate::predicate::Predicate;
use crate::query::{self, Query};
use crate::schema::{classify, ColumnInfo};

const AUTO_FIX_HINT: &str = "Enable auto-fix types to convert the join keys";
const QUERY_HINT: &str = "Try adjusting your conditions or check data types";

/// Operation that produced the current dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Simple,
    Query,
    Join,
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterKind::Simple => f.write_str("simple filters"),
            FilterKind::Query => f.write_str("query"),
            FilterKind::Join => f.write_str("join"),
        }
    }
}

/// Provenance of the current dataset.
///
/// `filtered_count <= original_count` holds for simple and query filters but
/// not for joins, which may add rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMetadata {
    pub active: bool,
    pub kind: Option<FilterKind>,
    pub original_count: usize,
    pub filtered_count: usize,
    /// One human-readable line per applied condition.
    pub descriptions: Vec<String>,
}

impl FilterMetadata {
    /// Metadata for an unfiltered dataset of `rows` rows.
    pub fn inactive(rows: usize) -> Self {
        Self {
            active: false,
            kind: None,
            original_count: rows,
            filtered_count: rows,
            descriptions: Vec::new(),
        }
    }

    /// Share of original rows removed, in percent. Negative when a join grew the data.
    pub fn reduction_pct(&self) -> f64 {
        if self.original_count == 0 {
            0.0
        } else {
            (self.original_count as f64 - self.filtered_count as f64) / self.original_count as f64
                * 100.0
        }
    }
}

/// Category of a problem reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// Bad user input for one filter; that filter is skipped.
    Validation,
    /// Join keys cannot be matched as typed.
    TypeIncompatibility,
    /// The predicate failed against the actual data.
    Evaluation,
    /// The operation is not possible in the current state.
    Precondition,
}

/// A user-facing problem raised by a session operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterIssue {
    pub kind: IssueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl FilterIssue {
    /// Convert a library error into an issue, optionally tied to a column.
    pub fn from_error(error: &SiftError, column: Option<&str>) -> Self {
        let kind = error.issue_kind();
        let hint = match kind {
            IssueKind::TypeIncompatibility => Some(AUTO_FIX_HINT.to_string()),
            _ => None,
        };
        Self {
            kind,
            column: column.map(str::to_string),
            message: error.to_string(),
            hint,
        }
    }

    fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.to_string());
        self
    }
}

impl fmt::Display for FilterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(column) = &self.column {
            write!(f, "{}: ", column)?;
        }
        f.write_str(&self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({})", hint)?;
        }
        Ok(())
    }
}

/// What every session operation returns. Operations never fail outright;
/// problems are listed in `issues`.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub dataset: Dataset,
    pub applied: bool,
    pub descriptions: Vec<String>,
    pub issues: Vec<FilterIssue>,
    /// Present after a successful join.
    pub join: Option<JoinReport>,
}

impl Outcome {
    /// True when no issue was raised.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Create a filter session over `dataset` with default configuration.
pub fn build_filter(dataset: Dataset) -> FilterSession {
    FilterSession::new(dataset)
}

/// One user's filtering state over one baseline dataset.
///
/// Every operation recomputes from the baseline and never mutates it, with
/// one exception: a successful join makes the joined dataset the new baseline.
#[derive(Debug, Clone)]
pub struct FilterSession {
    original: Dataset,
    filtered: Dataset,
    metadata: FilterMetadata,
    config: FilterConfig,
}

impl FilterSession {
    pub fn new(dataset: Dataset) -> Self {
        Self::with_config(dataset, FilterConfig::default())
    }

    pub fn with_config(dataset: Dataset, config: FilterConfig) -> Self {
        let metadata = FilterMetadata::inactive(dataset.row_count());
        Self {
            filtered: dataset.clone(),
            original: dataset,
            metadata,
            config,
        }
    }

    /// The baseline every filter reads from.
    pub fn original(&self) -> &Dataset {
        &self.original
    }

    /// The current filtered dataset.
    pub fn current(&self) -> &Dataset {
        &self.filtered
    }

    pub fn metadata(&self) -> &FilterMetadata {
        &self.metadata
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Column classification of the baseline.
    pub fn column_info(&self) -> ColumnInfo {
        classify(&self.original)
    }

    /// Apply per-column filters in order, each to the result of the previous.
    ///
    /// A filter that fails validation is skipped and reported; the others
    /// still apply.
    pub fn apply_simple_filters(&mut self, filters: &[SimpleFilter]) -> Outcome {
        let mut current = self.original.clone();
        let mut applied = false;
        let mut descriptions = Vec::new();
        let mut issues = Vec::new();

        for filter in filters {
            match filter.apply(&self.original, &current, &self.config) {
                Ok(step) => {
                    if let Some(description) = step.description {
                        log::debug!("applied {} ({} rows left)", description, step.dataset.row_count());
                        descriptions.push(description);
                    }
                    applied |= step.applied;
                    current = step.dataset;
                }
                Err(e) => {
                    let issue = FilterIssue::from_error(&e, Some(filter.column()));
                    log::warn!("skipping filter: {}", issue);
                    issues.push(issue);
                }
            }
        }

        self.commit(current, FilterKind::Simple, applied, descriptions, issues)
    }

    /// Compile `query` without applying it, for display.
    pub fn preview_query(&self, query: &Query) -> Result<Option<Predicate>> {
        query::compile(&self.original, query, &self.config)
    }

    /// Compile and evaluate `query` once against the baseline.
    ///
    /// Any failure leaves the dataset unfiltered and is reported as an issue.
    pub fn apply_query(&mut self, query: &Query) -> Outcome {
        let unfiltered = self.original.clone();

        if self.original.column_count() == 0 || self.original.is_empty() {
            let error = SiftError::Precondition("No data available for querying".to_string());
            return self.fail(unfiltered, FilterKind::Query, FilterIssue::from_error(&error, None));
        }

        let predicate = match query::compile(&self.original, query, &self.config) {
            Ok(Some(predicate)) => predicate,
            Ok(None) => {
                log::debug!("query has no conditions left; nothing to apply");
                return self.commit(unfiltered, FilterKind::Query, false, Vec::new(), Vec::new());
            }
            Err(e) => {
                let issue = FilterIssue::from_error(&e, None).with_hint(QUERY_HINT);
                return self.fail(unfiltered, FilterKind::Query, issue);
            }
        };

        match predicate.apply(&self.original) {
            Ok(dataset) => {
                let description = format!("Query: {}", predicate);
                self.commit(dataset, FilterKind::Query, true, vec![description], Vec::new())
            }
            Err(e) => {
                let issue = FilterIssue::from_error(&e, None).with_hint(QUERY_HINT);
                self.fail(unfiltered, FilterKind::Query, issue)
            }
        }
    }

    /// Join two pooled datasets.
    ///
    /// On success the joined dataset replaces the baseline, so later filters
    /// and `reset` work on it. On failure the session is left untouched.
    pub fn apply_join(&mut self, pool: &DatasetPool, spec: &JoinSpec) -> Outcome {
        match join::join(pool, spec, &self.config) {
            Ok((joined, report)) => {
                let before = self.original.row_count();
                self.original = joined.clone();
                self.filtered = joined;
                self.metadata = FilterMetadata {
                    active: true,
                    kind: Some(FilterKind::Join),
                    original_count: before,
                    filtered_count: self.filtered.row_count(),
                    descriptions: vec![spec.description()],
                };
                log::info!(
                    "join replaced baseline: {} -> {} rows",
                    before,
                    self.filtered.row_count()
                );
                Outcome {
                    dataset: self.filtered.clone(),
                    applied: true,
                    descriptions: self.metadata.descriptions.clone(),
                    issues: Vec::new(),
                    join: Some(report),
                }
            }
            Err(e) => {
                let issue = FilterIssue::from_error(&e, None);
                log::warn!("join failed: {}", issue);
                Outcome {
                    dataset: self.filtered.clone(),
                    applied: false,
                    descriptions: Vec::new(),
                    issues: vec![issue],
                    join: None,
                }
            }
        }
    }

    /// Drop all filters and return a copy of the baseline.
    pub fn reset(&mut self) -> Dataset {
        self.filtered = self.original.clone();
        self.metadata = FilterMetadata::inactive(self.original.row_count());
        self.filtered.clone()
    }

    fn commit(
        &mut self,
        dataset: Dataset,
        kind: FilterKind,
        applied: bool,
        descriptions: Vec<String>,
        issues: Vec<FilterIssue>,
    ) -> Outcome {
        self.metadata = FilterMetadata {
            active: applied,
            kind: Some(kind),
            original_count: self.original.row_count(),
            filtered_count: dataset.row_count(),
            descriptions: descriptions.clone(),
        };
        self.filtered = dataset;
        log::info!(
            "{}: {} of {} rows (active: {})",
            kind,
            self.metadata.filtered_count,
            self.metadata.original_count,
            applied
        );

        Outcome {
            dataset: self.filtered.clone(),
            applied,
            descriptions,
            issues,
            join: None,
        }
    }

    fn fail(&mut self, unfiltered: Dataset, kind: FilterKind, issue: FilterIssue) -> Outcome {
        log::warn!("{} not applied: {}", kind, issue);
        self.commit(unfiltered, kind, false, Vec::new(), vec![issue])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::predicate::Operator;
    use crate::query::{ConditionSpec, Connective};

    fn people() -> Dataset {
        Dataset::new(vec![
            Column::integer("age", [18, 25, 40, 60]),
            Column::text("city", ["NY", "LA", "NY", "SF"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_new_session_is_inactive() {
        let session = build_filter(people());
        assert_eq!(session.current(), session.original());
        assert!(!session.metadata().active);
        assert_eq!(session.metadata().kind, None);
        assert_eq!(session.metadata().original_count, 4);
    }

    #[test]
    fn test_simple_filters_chain() {
        let mut session = build_filter(people());
        let outcome = session.apply_simple_filters(&[
            SimpleFilter::numeric("age", 20.0, 60.0),
            SimpleFilter::values("city", ["NY"]),
        ]);

        assert!(outcome.applied);
        assert!(outcome.is_clean());
        assert_eq!(outcome.dataset.row_count(), 1);
        assert_eq!(outcome.descriptions, vec!["age: 20 to 60", "city: 1/3 values"]);
        assert_eq!(session.metadata().filtered_count, 1);
        assert!((session.metadata().reduction_pct() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_filter_does_not_block_others() {
        let mut session = build_filter(people());
        let outcome = session.apply_simple_filters(&[
            SimpleFilter::numeric("age", 50.0, 20.0),
            SimpleFilter::values("city", ["LA"]),
        ]);

        assert!(outcome.applied);
        assert_eq!(outcome.dataset.row_count(), 1);
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].kind, IssueKind::Validation);
        assert_eq!(outcome.issues[0].column.as_deref(), Some("age"));
    }

    #[test]
    fn test_wrong_filter_kind_reported() {
        let mut session = build_filter(people());
        let outcome = session.apply_simple_filters(&[SimpleFilter::numeric("city", 0.0, 1.0)]);
        assert!(!outcome.applied);
        assert_eq!(outcome.issues.len(), 1);
    }

    #[test]
    fn test_query() {
        let mut session = build_filter(people());
        let query = Query::new(ConditionSpec::new("age", Operator::Gt, "30"))
            .then(Connective::And, ConditionSpec::new("city", Operator::Eq, "NY"));
        let outcome = session.apply_query(&query);

        assert!(outcome.applied);
        assert_eq!(outcome.dataset.row_count(), 1);
        assert_eq!(outcome.descriptions, vec!["Query: `age` > 30 and `city` == 'NY'"]);
        assert_eq!(session.metadata().kind, Some(FilterKind::Query));
    }

    #[test]
    fn test_query_reads_from_original_not_current() {
        let mut session = build_filter(people());
        session.apply_simple_filters(&[SimpleFilter::values("city", ["LA"])]);
        let outcome = session.apply_query(&Query::new(ConditionSpec::new("city", Operator::Eq, "NY")));
        assert_eq!(outcome.dataset.row_count(), 2);
    }

    #[test]
    fn test_query_error_returns_unfiltered() {
        let mut session = build_filter(people());
        let bad = Query::new(ConditionSpec::new("age", Operator::Gt, "thirty"));
        let outcome = session.apply_query(&bad);

        assert!(!outcome.applied);
        assert_eq!(outcome.dataset, people());
        assert_eq!(outcome.issues.len(), 1);
        assert!(outcome.issues[0].hint.is_some());
    }

    #[test]
    fn test_query_on_empty_dataset_is_precondition() {
        let empty = Dataset::new(vec![Column::integer("age", [])]).unwrap();
        let mut session = build_filter(empty);
        let outcome = session.apply_query(&Query::new(ConditionSpec::new("age", Operator::Gt, "1")));
        assert_eq!(outcome.issues[0].kind, IssueKind::Precondition);
    }

    #[test]
    fn test_join_replaces_baseline() {
        let orders = Dataset::new(vec![
            Column::integer("customer_id", [1, 1, 2]),
            Column::float("amount", [3.0, 4.0, 5.0]),
        ])
        .unwrap();
        let customers = Dataset::new(vec![
            Column::integer("id", [1, 2, 3]),
            Column::text("name", ["Ann", "Bo", "Cy"]),
        ])
        .unwrap();
        let pool = DatasetPool::new()
            .with("orders", orders.clone())
            .with("customers", customers);

        let mut session = build_filter(orders);
        let outcome = session.apply_join(&pool, &JoinSpec::new("orders", "customers", "customer_id", "id"));

        assert!(outcome.applied);
        assert!(outcome.join.is_some());
        assert_eq!(session.original().column_count(), 4);
        assert_eq!(
            session.metadata().descriptions,
            vec!["Joined orders + customers on customer_id/id"]
        );

        let reset = session.reset();
        assert_eq!(reset.column_count(), 4);
        assert!(!session.metadata().active);
    }

    #[test]
    fn test_failed_join_leaves_session_unchanged() {
        let mut session = build_filter(people());
        session.apply_simple_filters(&[SimpleFilter::values("city", ["NY"])]);
        let before = session.current().clone();

        let pool = DatasetPool::new().with("people", people());
        let outcome = session.apply_join(&pool, &JoinSpec::new("people", "other", "age", "age"));

        assert!(!outcome.applied);
        assert_eq!(outcome.issues[0].kind, IssueKind::Precondition);
        assert_eq!(session.current(), &before);
        assert!(session.metadata().active);
    }

    #[test]
    fn test_reset_with_nan_cell() {
        let original = crate::input::Parser::new()
            .parse_str("id,score\n1,0.5\n2,nan\n3,1.5\n")
            .unwrap();
        let mut session = build_filter(original.clone());
        session.apply_simple_filters(&[SimpleFilter::numeric("id", 2.0, 3.0)]);

        assert_eq!(session.reset(), original);
        assert_eq!(session.current(), &original);
    }

    #[test]
    fn test_reset() {
        let mut session = build_filter(people());
        session.apply_simple_filters(&[SimpleFilter::numeric("age", 20.0, 30.0)]);
        let reset = session.reset();
        assert_eq!(reset, people());
        assert!(!session.metadata().active);
        assert_eq!(session.metadata().filtered_count, 4);
    }
}
