//! Named datasets available as join candidates.

use indexmap::IndexMap;

use crate::dataset::Dataset;
use crate::error::{Result, SiftError};

/// Mapping from dataset name to dataset, in insertion order.
///
/// Passed explicitly to the join engine; nothing reads it from ambient state.
#[derive(Debug, Clone, Default)]
pub struct DatasetPool {
    datasets: IndexMap<String, Dataset>,
}

impl DatasetPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a dataset, returning the previous one under that name.
    pub fn insert(&mut self, name: impl Into<String>, dataset: Dataset) -> Option<Dataset> {
        self.datasets.insert(name.into(), dataset)
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, dataset: Dataset) -> Self {
        self.insert(name, dataset);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Dataset> {
        self.datasets.get(name)
    }

    /// Look up a dataset, failing with `DatasetNotFound`.
    pub fn require(&self, name: &str) -> Result<&Dataset> {
        self.get(name)
            .ok_or_else(|| SiftError::DatasetNotFound(name.to_string()))
    }

    pub fn names(&self) -> Vec<&str> {
        self.datasets.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Every dataset name other than `left`, as right-hand join candidates.
    pub fn join_candidates(&self, left: &str) -> Vec<&str> {
        self.datasets
            .keys()
            .filter(|name| name.as_str() != left)
            .map(String::as_str)
            .collect()
    }

    /// Name of the first pool entry equal to `dataset`.
    pub fn name_of(&self, dataset: &Dataset) -> Option<&str> {
        self.datasets
            .iter()
            .find(|(_, ds)| *ds == dataset)
            .map(|(name, _)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Column;
    use crate::input::Parser;

    #[test]
    fn test_candidates_and_lookup() {
        let a = Dataset::new(vec![Column::integer("x", [1])]).unwrap();
        let b = Dataset::new(vec![Column::integer("y", [2])]).unwrap();
        let pool = DatasetPool::new().with("a", a.clone()).with("b", b);

        assert_eq!(pool.len(), 2);
        assert_eq!(pool.join_candidates("a"), vec!["b"]);
        assert_eq!(pool.name_of(&a), Some("a"));
        assert!(matches!(pool.require("c"), Err(SiftError::DatasetNotFound(_))));
    }

    #[test]
    fn test_name_of_with_nan_cell() {
        let a = Parser::new().parse_str("id,score\n1,0.5\n2,nan\n3,1.5\n").unwrap();
        let b = Dataset::new(vec![Column::integer("id", [1])]).unwrap();
        let pool = DatasetPool::new().with("a", a.clone()).with("b", b);

        assert_eq!(a, a.clone());
        assert_eq!(pool.name_of(&a), Some("a"));
    }
}
