//! Typed row predicates evaluated directly against dataset columns.
//!
//! User input never becomes expression text. Conditions are resolved into a
//! [`Predicate`] tree whose leaves name a column and carry a typed literal, so
//! there is nothing to escape and nothing to inject. The `Display` rendering
//! quotes identifiers and escapes literals, but exists only for provenance.

use std::collections::HashSet;
use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dataset::{Column, Dataset, Value};
use crate::error::{Result, SiftError};
use crate::schema::DataType;

/// Comparison operator of a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Gt,
    Lt,
    Ge,
    Le,
    Eq,
    Ne,
    /// Case-insensitive substring containment.
    Contains,
}

impl Operator {
    /// Operators allowed on numeric columns.
    pub const NUMERIC: &'static [Operator] = &[
        Operator::Gt,
        Operator::Lt,
        Operator::Ge,
        Operator::Le,
        Operator::Eq,
        Operator::Ne,
    ];

    /// Operators allowed on categorical/text columns.
    pub const CATEGORICAL: &'static [Operator] = &[Operator::Eq, Operator::Ne, Operator::Contains];

    /// Operators allowed on any other column kind.
    pub const EQUALITY: &'static [Operator] = &[Operator::Eq, Operator::Ne];

    /// Parse the textual form (`>`, `<`, `>=`, `<=`, `==`, `!=`, `contains`).
    pub fn parse(symbol: &str) -> Option<Operator> {
        match symbol.trim() {
            ">" => Some(Operator::Gt),
            "<" => Some(Operator::Lt),
            ">=" => Some(Operator::Ge),
            "<=" => Some(Operator::Le),
            "==" | "=" => Some(Operator::Eq),
            "!=" => Some(Operator::Ne),
            s if s.eq_ignore_ascii_case("contains") => Some(Operator::Contains),
            _ => None,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
            Operator::Eq => "==",
            Operator::Ne => "!=",
            Operator::Contains => "contains",
        }
    }

    fn compare<T: PartialOrd>(&self, left: &T, right: &T) -> Option<bool> {
        match self {
            Operator::Gt => Some(left > right),
            Operator::Lt => Some(left < right),
            Operator::Ge => Some(left >= right),
            Operator::Le => Some(left <= right),
            Operator::Eq => Some(left == right),
            Operator::Ne => Some(left != right),
            Operator::Contains => None,
        }
    }

    // Missing cells only satisfy inequality.
    fn on_null(&self) -> bool {
        matches!(self, Operator::Ne)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Condition literal, typed once when the condition is built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ConditionValue {
    Number(f64),
    Text(String),
    Date(NaiveDateTime),
}

/// A boolean test over the rows of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `column <op> value`.
    Compare {
        column: String,
        op: Operator,
        value: ConditionValue,
    },
    /// Numeric value within `[min, max]`, inclusive.
    Between { column: String, min: f64, max: f64 },
    /// Date component within `[start, end]`, inclusive.
    DateBetween {
        column: String,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Rendered value is one of `values`.
    InSet { column: String, values: Vec<String> },
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    pub fn compare(column: impl Into<String>, op: Operator, value: ConditionValue) -> Self {
        Predicate::Compare {
            column: column.into(),
            op,
            value,
        }
    }

    pub fn and(self, other: Predicate) -> Self {
        Predicate::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Predicate) -> Self {
        Predicate::Or(Box::new(self), Box::new(other))
    }

    /// Evaluate to a boolean mask with one entry per row.
    pub fn evaluate(&self, dataset: &Dataset) -> Result<Vec<bool>> {
        match self {
            Predicate::Compare { column, op, value } => {
                let col = lookup(dataset, column)?;
                eval_compare(col, *op, value)
            }
            Predicate::Between { column, min, max } => {
                let col = lookup(dataset, column)?;
                expect_type(col, DataType::is_numeric, "a numeric range")?;
                Ok(col
                    .values()
                    .iter()
                    .map(|v| v.as_f64().is_some_and(|x| *min <= x && x <= *max))
                    .collect())
            }
            Predicate::DateBetween { column, start, end } => {
                let col = lookup(dataset, column)?;
                expect_type(col, DataType::is_temporal, "a date range")?;
                Ok(col
                    .values()
                    .iter()
                    .map(|v| {
                        v.as_datetime()
                            .map(|dt| dt.date())
                            .is_some_and(|d| *start <= d && d <= *end)
                    })
                    .collect())
            }
            Predicate::InSet { column, values } => {
                let col = lookup(dataset, column)?;
                let wanted: HashSet<&str> = values.iter().map(String::as_str).collect();
                Ok(col
                    .values()
                    .iter()
                    .map(|v| !v.is_null() && wanted.contains(v.to_string().as_str()))
                    .collect())
            }
            Predicate::And(left, right) => {
                let l = left.evaluate(dataset)?;
                let r = right.evaluate(dataset)?;
                Ok(l.iter().zip(&r).map(|(a, b)| *a && *b).collect())
            }
            Predicate::Or(left, right) => {
                let l = left.evaluate(dataset)?;
                let r = right.evaluate(dataset)?;
                Ok(l.iter().zip(&r).map(|(a, b)| *a || *b).collect())
            }
        }
    }

    /// Rows of `dataset` satisfying the predicate, as a new dataset.
    pub fn apply(&self, dataset: &Dataset) -> Result<Dataset> {
        let mask = self.evaluate(dataset)?;
        Ok(dataset.filter(&mask))
    }

    fn is_compound(&self) -> bool {
        matches!(self, Predicate::And(..) | Predicate::Or(..))
    }
}

fn lookup<'a>(dataset: &'a Dataset, column: &str) -> Result<&'a Column> {
    dataset
        .column(column)
        .ok_or_else(|| SiftError::Evaluation(format!("unknown column '{}'", column)))
}

fn expect_type(col: &Column, check: fn(&DataType) -> bool, what: &str) -> Result<()> {
    if check(&col.data_type()) {
        Ok(())
    } else {
        Err(SiftError::Evaluation(format!(
            "{} does not apply to {} column '{}'",
            what,
            col.data_type(),
            col.name()
        )))
    }
}

fn mismatch(col: &Column, op: Operator, literal: &str) -> SiftError {
    SiftError::Evaluation(format!(
        "cannot apply '{}' between {} column '{}' and {}",
        op,
        col.data_type(),
        col.name(),
        literal
    ))
}

fn eval_compare(col: &Column, op: Operator, value: &ConditionValue) -> Result<Vec<bool>> {
    let values = col.values();
    match value {
        ConditionValue::Number(n) => {
            if !col.data_type().is_numeric() || op == Operator::Contains {
                return Err(mismatch(col, op, "a number"));
            }
            Ok(values
                .iter()
                .map(|v| match v.as_f64() {
                    Some(x) => op.compare(&x, n).unwrap_or(false),
                    None => op.on_null(),
                })
                .collect())
        }
        ConditionValue::Date(target) => {
            if !col.data_type().is_temporal() || op == Operator::Contains {
                return Err(mismatch(col, op, "a date"));
            }
            Ok(values
                .iter()
                .map(|v| match v.as_datetime() {
                    Some(dt) => op.compare(&dt, target).unwrap_or(false),
                    None => op.on_null(),
                })
                .collect())
        }
        ConditionValue::Text(text) => match col.data_type() {
            DataType::Text if op == Operator::Contains => {
                let needle = text.to_lowercase();
                Ok(values
                    .iter()
                    .map(|v| {
                        v.as_text()
                            .is_some_and(|s| s.to_lowercase().contains(&needle))
                    })
                    .collect())
            }
            DataType::Text => Ok(values
                .iter()
                .map(|v| match v.as_text() {
                    Some(s) => op.compare(&s, &text.as_str()).unwrap_or(false),
                    None => op.on_null(),
                })
                .collect()),
            DataType::Boolean if matches!(op, Operator::Eq | Operator::Ne) => {
                let target = if text.trim().eq_ignore_ascii_case("true") {
                    true
                } else if text.trim().eq_ignore_ascii_case("false") {
                    false
                } else {
                    return Err(mismatch(col, op, "a non-boolean text value"));
                };
                Ok(values
                    .iter()
                    .map(|v| match v {
                        Value::Bool(b) => op.compare(b, &target).unwrap_or(false),
                        _ => op.on_null(),
                    })
                    .collect())
            }
            _ => Err(mismatch(col, op, "text")),
        },
    }
}

/// Quote an identifier with backticks, doubling embedded backticks.
pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Quote a string literal with single quotes, escaping quotes and backslashes.
pub fn quote_literal(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"");
    format!("'{}'", escaped)
}

impl fmt::Display for ConditionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionValue::Number(n) => write!(f, "{}", n),
            ConditionValue::Text(t) => f.write_str(&quote_literal(t)),
            ConditionValue::Date(d) => {
                f.write_str(&quote_literal(&Value::DateTime(*d).to_string()))
            }
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Compare {
                column,
                op: Operator::Contains,
                value,
            } => write!(f, "{}.contains({})", quote_identifier(column), value),
            Predicate::Compare { column, op, value } => {
                write!(f, "{} {} {}", quote_identifier(column), op, value)
            }
            Predicate::Between { column, min, max } => {
                write!(f, "{} between {} and {}", quote_identifier(column), min, max)
            }
            Predicate::DateBetween { column, start, end } => write!(
                f,
                "{} between {} and {}",
                quote_identifier(column),
                quote_literal(&start.to_string()),
                quote_literal(&end.to_string())
            ),
            Predicate::InSet { column, values } => {
                let items: Vec<String> = values.iter().map(|v| quote_literal(v)).collect();
                write!(f, "{} in ({})", quote_identifier(column), items.join(", "))
            }
            Predicate::And(left, right) => write_binary(f, "and", left, right),
            Predicate::Or(left, right) => write_binary(f, "or", left, right),
        }
    }
}

fn write_binary(
    f: &mut fmt::Formatter<'_>,
    connective: &str,
    left: &Predicate,
    right: &Predicate,
) -> fmt::Result {
    let same = |p: &Predicate| match p {
        Predicate::And(..) => connective == "and",
        Predicate::Or(..) => connective == "or",
        _ => true,
    };
    // The left operand of a left-associative chain needs no parentheses.
    if left.is_compound() && !same(left) {
        write!(f, "({})", left)?;
    } else {
        write!(f, "{}", left)?;
    }
    write!(f, " {} ", connective)?;
    if right.is_compound() {
        write!(f, "({})", right)
    } else {
        write!(f, "{}", right)
    }
}
