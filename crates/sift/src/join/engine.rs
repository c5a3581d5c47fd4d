//! Relational joins between two pooled datasets.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::FilterConfig;
use crate::dataset::{Column, Dataset, Value};
use crate::error::{Result, SiftError};
use crate::schema::DataType;

use super::pool::DatasetPool;

/// Relational join semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKind {
    /// Only matched key pairs.
    #[default]
    Inner,
    /// All left rows plus matches.
    Left,
    /// All right rows plus matches.
    Right,
    /// Union of both sides.
    Outer,
}

impl FromStr for JoinKind {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inner" => Ok(JoinKind::Inner),
            "left" => Ok(JoinKind::Left),
            "right" => Ok(JoinKind::Right),
            "outer" | "full" => Ok(JoinKind::Outer),
            other => Err(SiftError::Validation(format!("unknown join kind '{}'", other))),
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JoinKind::Inner => "inner",
            JoinKind::Left => "left",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        };
        f.write_str(name)
    }
}

/// Which datasets to join, on which keys, and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub left: String,
    pub right: String,
    pub left_key: String,
    pub right_key: String,
    #[serde(default)]
    pub kind: JoinKind,
    /// Convert mismatched key types instead of failing.
    #[serde(default)]
    pub auto_fix: bool,
}

impl JoinSpec {
    /// Inner join without type fixing.
    pub fn new(
        left: impl Into<String>,
        right: impl Into<String>,
        left_key: impl Into<String>,
        right_key: impl Into<String>,
    ) -> Self {
        Self {
            left: left.into(),
            right: right.into(),
            left_key: left_key.into(),
            right_key: right_key.into(),
            kind: JoinKind::Inner,
            auto_fix: false,
        }
    }

    pub fn with_kind(mut self, kind: JoinKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_auto_fix(mut self, auto_fix: bool) -> Self {
        self.auto_fix = auto_fix;
        self
    }

    /// Provenance line for a successful join.
    pub fn description(&self) -> String {
        format!(
            "Joined {} + {} on {}/{}",
            self.left, self.right, self.left_key, self.right_key
        )
    }
}

/// Outcome of comparing the declared types of two join keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum KeyCompatibility {
    Compatible { data_type: DataType },
    Mismatch { left: DataType, right: DataType },
}

impl KeyCompatibility {
    pub fn is_compatible(&self) -> bool {
        matches!(self, KeyCompatibility::Compatible { .. })
    }
}

/// Summary shown after a successful join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinReport {
    pub kind: JoinKind,
    pub left_rows: usize,
    pub right_rows: usize,
    pub result_rows: usize,
    pub column_count: usize,
    /// `result_rows / max(left_rows, right_rows) * 100`.
    pub efficiency_pct: f64,
    /// Key conversion performed by auto-fix, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coercion: Option<String>,
}

/// Compare the declared types of the two key columns.
pub fn check_key_types(
    left: &Dataset,
    right: &Dataset,
    left_key: &str,
    right_key: &str,
) -> Result<KeyCompatibility> {
    let l = left.require_column(left_key)?.data_type();
    let r = right.require_column(right_key)?.data_type();
    if l == r {
        Ok(KeyCompatibility::Compatible { data_type: l })
    } else {
        Ok(KeyCompatibility::Mismatch { left: l, right: r })
    }
}

/// Target types for auto-fixing mismatched keys.
///
/// Text wins over everything; otherwise an integer key widens to float.
fn reconcile(left: DataType, right: DataType) -> Option<(DataType, DataType)> {
    match (left, right) {
        (l, r) if l.is_textual() || r.is_textual() => Some((DataType::Text, DataType::Text)),
        (DataType::Integer, DataType::Float) => Some((DataType::Float, DataType::Float)),
        (DataType::Float, DataType::Integer) => Some((DataType::Float, DataType::Float)),
        _ => None,
    }
}

/// Join two datasets from `pool` according to `spec`.
///
/// Neither input is modified; the result is a new dataset.
pub fn join(
    pool: &DatasetPool,
    spec: &JoinSpec,
    config: &FilterConfig,
) -> Result<(Dataset, JoinReport)> {
    if pool.len() < 2 {
        return Err(SiftError::Precondition(
            "Need at least 2 datasets to perform join".to_string(),
        ));
    }
    if spec.left == spec.right {
        return Err(SiftError::Precondition(format!(
            "Cannot join dataset '{}' with itself; choose a different right dataset",
            spec.left
        )));
    }

    let left = pool.require(&spec.left)?;
    let right = pool.require(&spec.right)?;

    let mut left_prep = left.clone();
    let mut right_prep = right.clone();
    let mut coercion = None;

    if let KeyCompatibility::Mismatch { left: lt, right: rt } =
        check_key_types(left, right, &spec.left_key, &spec.right_key)?
    {
        if !spec.auto_fix {
            return Err(SiftError::TypeMismatch(format!(
                "key '{}' is {} but key '{}' is {}",
                spec.left_key, lt, spec.right_key, rt
            )));
        }
        let (left_target, right_target) = reconcile(lt, rt).ok_or_else(|| {
            SiftError::TypeMismatch(format!(
                "no automatic conversion between {} key '{}' and {} key '{}'",
                lt, spec.left_key, rt, spec.right_key
            ))
        })?;

        let converted = left.require_column(&spec.left_key)?.cast(left_target)?;
        left_prep.replace_column(converted)?;
        let converted = right.require_column(&spec.right_key)?.cast(right_target)?;
        right_prep.replace_column(converted)?;

        let note = format!("{}/{} → {}/{}", lt, rt, left_target, right_target);
        log::warn!(
            "auto-fixed join key types for '{}'/'{}': {}",
            spec.left_key,
            spec.right_key,
            note
        );
        coercion = Some(note);
    }

    let joined = merge(
        &left_prep,
        &right_prep,
        &spec.left_key,
        &spec.right_key,
        spec.kind,
        config,
    )?;

    let widest = left.row_count().max(right.row_count());
    let efficiency_pct = if widest == 0 {
        0.0
    } else {
        joined.row_count() as f64 / widest as f64 * 100.0
    };

    let report = JoinReport {
        kind: spec.kind,
        left_rows: left.row_count(),
        right_rows: right.row_count(),
        result_rows: joined.row_count(),
        column_count: joined.column_count(),
        efficiency_pct,
        coercion,
    };

    log::info!(
        "{} join {} + {}: {} rows, {} columns ({:.1}% efficiency)",
        spec.kind,
        spec.left,
        spec.right,
        report.result_rows,
        report.column_count,
        report.efficiency_pct
    );

    Ok((joined, report))
}

/// Hashable form of a non-null key value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyValue {
    Int(i64),
    Float(u64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

impl KeyValue {
    // Nulls and NaN never match anything.
    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::Float(f) if f.is_nan() => None,
            Value::Int(i) => Some(KeyValue::Int(*i)),
            Value::Float(f) => Some(KeyValue::Float((f + 0.0).to_bits())),
            Value::Bool(b) => Some(KeyValue::Bool(*b)),
            Value::Text(s) => Some(KeyValue::Text(s.clone())),
            Value::DateTime(dt) => Some(KeyValue::DateTime(*dt)),
        }
    }
}

fn index_keys(column: &Column) -> HashMap<KeyValue, Vec<usize>> {
    let mut index: HashMap<KeyValue, Vec<usize>> = HashMap::new();
    for (row, value) in column.values().iter().enumerate() {
        if let Some(key) = KeyValue::from_value(value) {
            index.entry(key).or_default().push(row);
        }
    }
    index
}

/// Row pairs `(left, right)` produced by the join, `None` marking the unmatched side.
fn pair_rows(
    left_key: &Column,
    right_key: &Column,
    kind: JoinKind,
) -> Vec<(Option<usize>, Option<usize>)> {
    let mut pairs = Vec::new();

    if kind == JoinKind::Right {
        let left_index = index_keys(left_key);
        for (r, value) in right_key.values().iter().enumerate() {
            match KeyValue::from_value(value).and_then(|k| left_index.get(&k)) {
                Some(matches) => pairs.extend(matches.iter().map(|&l| (Some(l), Some(r)))),
                None => pairs.push((None, Some(r))),
            }
        }
        return pairs;
    }

    let right_index = index_keys(right_key);
    let mut right_matched = vec![false; right_key.len()];
    for (l, value) in left_key.values().iter().enumerate() {
        match KeyValue::from_value(value).and_then(|k| right_index.get(&k)) {
            Some(matches) => {
                for &r in matches {
                    right_matched[r] = true;
                    pairs.push((Some(l), Some(r)));
                }
            }
            None if kind != JoinKind::Inner => pairs.push((Some(l), None)),
            None => {}
        }
    }

    if kind == JoinKind::Outer {
        pairs.extend(
            right_matched
                .iter()
                .enumerate()
                .filter(|(_, matched)| !**matched)
                .map(|(r, _)| (None, Some(r))),
        );
    }

    pairs
}

/// Merge two prepared datasets on their key columns.
///
/// Equal key names collapse into one key column, filled from whichever side
/// matched. Other overlapping names get the configured side suffixes.
fn merge(
    left: &Dataset,
    right: &Dataset,
    left_key: &str,
    right_key: &str,
    kind: JoinKind,
    config: &FilterConfig,
) -> Result<Dataset> {
    let lk = left.require_column(left_key)?;
    let rk = right.require_column(right_key)?;
    let pairs = pair_rows(lk, rk, kind);
    let left_rows: Vec<Option<usize>> = pairs.iter().map(|(l, _)| *l).collect();
    let right_rows: Vec<Option<usize>> = pairs.iter().map(|(_, r)| *r).collect();

    let shared_key = left_key == right_key;
    let mut columns = Vec::with_capacity(left.column_count() + right.column_count());

    for col in left.columns() {
        if shared_key && col.name() == left_key {
            let from_left = col.take(&left_rows);
            let from_right = rk.take(&right_rows);
            let values = from_left
                .values()
                .iter()
                .zip(from_right.values())
                .map(|(l, r)| if l.is_null() { r.clone() } else { l.clone() })
                .collect();
            columns.push(Column::new(left_key, col.data_type(), values));
            continue;
        }
        let taken = col.take(&left_rows);
        if right.has_column(col.name()) {
            columns.push(taken.renamed(format!("{}{}", col.name(), config.left_suffix)));
        } else {
            columns.push(taken);
        }
    }

    for col in right.columns() {
        if shared_key && col.name() == right_key {
            continue;
        }
        let taken = col.take(&right_rows);
        if left.has_column(col.name()) {
            columns.push(taken.renamed(format!("{}{}", col.name(), config.right_suffix)));
        } else {
            columns.push(taken);
        }
    }

    Dataset::new(columns).map_err(|e| SiftError::Merge(e.to_string()))
}
