//! Cell values.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{Result, SiftError};
use crate::schema::DataType;

/// Accepted date/time layouts, tried in order.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// A single cell of a dataset.
#[derive(Debug, Clone)]
pub enum Value {
    /// Missing value.
    Null,
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
    DateTime(NaiveDateTime),
}

// Cell equality: two NaN floats are the same cell, so a dataset equals its own copy.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Returns true for a missing value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) if !f.is_nan() => Some(*f),
            _ => None,
        }
    }

    /// Text view of the value, if it is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Date/time view of the value, if it is temporal.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// The data type this value belongs to (`None` for nulls).
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Value::Null => None,
            Value::Int(_) => Some(DataType::Integer),
            Value::Float(_) => Some(DataType::Float),
            Value::Bool(_) => Some(DataType::Boolean),
            Value::Text(_) => Some(DataType::Text),
            Value::DateTime(_) => Some(DataType::DateTime),
        }
    }

    /// Convert the value to another data type. Nulls stay null.
    pub fn cast(&self, target: DataType) -> Result<Value> {
        let converted = match (self, target) {
            (Value::Null, _) => Value::Null,
            (_, DataType::Text) => Value::Text(self.to_string()),
            (Value::Int(i), DataType::Float) => Value::Float(*i as f64),
            (Value::Int(i), DataType::Integer) => Value::Int(*i),
            (Value::Float(f), DataType::Float) => Value::Float(*f),
            (Value::Float(f), DataType::Integer) if f.fract() == 0.0 && f.is_finite() => {
                Value::Int(*f as i64)
            }
            (Value::Bool(b), DataType::Boolean) => Value::Bool(*b),
            (Value::DateTime(dt), DataType::DateTime) => Value::DateTime(*dt),
            (Value::Text(s), DataType::Integer) => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| cast_error(self, target))?,
            (Value::Text(s), DataType::Float) => s
                .trim()
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| cast_error(self, target))?,
            (Value::Text(s), DataType::DateTime) => parse_datetime(s)
                .map(Value::DateTime)
                .ok_or_else(|| cast_error(self, target))?,
            _ => return Err(cast_error(self, target)),
        };
        Ok(converted)
    }
}

fn cast_error(value: &Value, target: DataType) -> SiftError {
    SiftError::TypeMismatch(format!("cannot convert '{}' to {}", value, target))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Text(s) => f.write_str(s),
            Value::DateTime(dt) => {
                if dt.time() == NaiveTime::MIN {
                    write!(f, "{}", dt.format("%Y-%m-%d"))
                } else {
                    write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S"))
                }
            }
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

impl From<NaiveDate> for Value {
    fn from(value: NaiveDate) -> Self {
        Value::DateTime(value.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Parse a date or date/time string. Bare dates map to midnight.
pub fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let trimmed = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| parse_date(trimmed).map(|d| d.and_time(NaiveTime::MIN)))
}

/// Parse a date-only string.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}
