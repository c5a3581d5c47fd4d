//! A named, typed column of values.

use chrono::NaiveDateTime;

use crate::error::Result;
use crate::schema::DataType;

use super::value::Value;

/// A named column. Every value is either null or of the column's data type.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data_type: DataType,
    values: Vec<Value>,
}

impl Column {
    /// Create a column from already-typed values.
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    /// Integer column.
    pub fn integer(name: impl Into<String>, values: impl IntoIterator<Item = i64>) -> Self {
        Self::new(name, DataType::Integer, values.into_iter().map(Value::Int).collect())
    }

    /// Float column.
    pub fn float(name: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self::new(name, DataType::Float, values.into_iter().map(Value::Float).collect())
    }

    /// Boolean column.
    pub fn boolean(name: impl Into<String>, values: impl IntoIterator<Item = bool>) -> Self {
        Self::new(name, DataType::Boolean, values.into_iter().map(Value::Bool).collect())
    }

    /// Text column.
    pub fn text<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            DataType::Text,
            values.into_iter().map(|s| Value::Text(s.into())).collect(),
        )
    }

    /// Date/time column.
    pub fn datetime(
        name: impl Into<String>,
        values: impl IntoIterator<Item = NaiveDateTime>,
    ) -> Self {
        Self::new(
            name,
            DataType::DateTime,
            values.into_iter().map(Value::DateTime).collect(),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn get(&self, row: usize) -> Option<&Value> {
        self.values.get(row)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of null values.
    pub fn null_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_null()).count()
    }

    /// Copy of this column under a different name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: self.data_type,
            values: self.values.clone(),
        }
    }

    /// Keep the values whose mask entry is true.
    pub fn filter(&self, mask: &[bool]) -> Self {
        let values = self
            .values
            .iter()
            .zip(mask)
            .filter(|(_, keep)| **keep)
            .map(|(v, _)| v.clone())
            .collect();
        Self::new(self.name.clone(), self.data_type, values)
    }

    /// Gather values by row index; `None` produces a null.
    pub fn take(&self, indices: &[Option<usize>]) -> Self {
        let values = indices
            .iter()
            .map(|idx| {
                idx.and_then(|i| self.values.get(i).cloned())
                    .unwrap_or(Value::Null)
            })
            .collect();
        Self::new(self.name.clone(), self.data_type, values)
    }

    /// Convert every value to `target`.
    pub fn cast(&self, target: DataType) -> Result<Self> {
        if target == self.data_type {
            return Ok(self.clone());
        }
        let values = self
            .values
            .iter()
            .map(|v| v.cast(target))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(self.name.clone(), target, values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_and_take() {
        let col = Column::integer("n", [1, 2, 3]);
        assert_eq!(col.filter(&[true, false, true]).values(), &[Value::Int(1), Value::Int(3)]);

        let taken = col.take(&[Some(2), None, Some(0)]);
        assert_eq!(taken.values(), &[Value::Int(3), Value::Null, Value::Int(1)]);
        assert_eq!(taken.null_count(), 1);
    }

    #[test]
    fn test_cast_to_text() {
        let col = Column::integer("id", [7, 8]).cast(DataType::Text).unwrap();
        assert_eq!(col.data_type(), DataType::Text);
        assert_eq!(col.values()[0], Value::Text("7".to_string()));
    }
}
