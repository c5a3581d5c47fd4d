//! Sift: interactive filtering, querying and joining of tabular datasets.
//!
//! Sift classifies the columns of a dataset, builds filters over them from
//! structured user selections, compiles multi-condition queries into a typed
//! predicate tree and joins pairs of datasets on key columns.
//!
//! # Core Principles
//!
//! - **Non-destructive**: filters always read from the baseline dataset
//! - **No text evaluation**: user values become typed literals, never code
//! - **Explained**: every applied condition carries a readable description
//!
//! # Example
//!
//! ```no_run
//! use sift::{build_filter, Parser, SimpleFilter};
//!
//! let (dataset, _) = Parser::new().parse_file("people.csv").unwrap();
//! let mut session = build_filter(dataset);
//! let outcome = session.apply_simple_filters(&[SimpleFilter::numeric("age", 25.0, 40.0)]);
//!
//! println!("{} rows", outcome.dataset.row_count());
//! println!("{:?}", outcome.descriptions);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod input;
pub mod join;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod session;

pub use config::FilterConfig;
pub use dataset::{Column, Dataset, Value};
pub use error::{Result, SiftError};
pub use filter::{
    categorical_choices, datetime_bounds, numeric_summary, CategoricalChoices, CategoricalSelection,
    DateRange, NumericRange, NumericSummary, SimpleFilter,
};
pub use input::{Parser, ParserConfig, SourceMetadata};
pub use join::{check_key_types, join, DatasetPool, JoinKind, JoinReport, JoinSpec, KeyCompatibility};
pub use predicate::{ConditionValue, Operator, Predicate};
pub use query::{compile, ConditionSpec, Connective, Query};
pub use schema::{classify, ColumnInfo, ColumnKind, DataType};
pub use session::{
    build_filter, FilterIssue, FilterKind, FilterMetadata, FilterSession, IssueKind, Outcome,
};
