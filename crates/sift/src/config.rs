//! Engine configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};

/// Distinct-value count at or below which a categorical filter offers a value subset.
pub const DEFAULT_CATEGORICAL_THRESHOLD: usize = 50;

/// Maximum number of conditions a single query may hold.
pub const DEFAULT_MAX_CONDITIONS: usize = 5;

/// Configuration shared by every operation of a filter session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Categorical columns with more distinct values than this switch to text search.
    pub categorical_threshold: usize,
    /// Upper bound on conditions per query.
    pub max_conditions: usize,
    /// Suffix for overlapping columns coming from the left dataset of a join.
    pub left_suffix: String,
    /// Suffix for overlapping columns coming from the right dataset of a join.
    pub right_suffix: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            categorical_threshold: DEFAULT_CATEGORICAL_THRESHOLD,
            max_conditions: DEFAULT_MAX_CONDITIONS,
            left_suffix: "_left".to_string(),
            right_suffix: "_right".to_string(),
        }
    }
}

impl FilterConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the categorical distinct-value threshold.
    pub fn with_categorical_threshold(mut self, threshold: usize) -> Self {
        self.categorical_threshold = threshold;
        self
    }

    /// Set the maximum number of query conditions.
    pub fn with_max_conditions(mut self, max: usize) -> Self {
        self.max_conditions = max;
        self
    }

    /// Set the join suffixes for overlapping column names.
    pub fn with_suffixes(mut self, left: impl Into<String>, right: impl Into<String>) -> Self {
        self.left_suffix = left.into();
        self.right_suffix = right.into();
        self
    }

    /// Load a configuration from a JSON file. Missing fields keep their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| SiftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: FilterConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the settings are usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_conditions == 0 {
            return Err(SiftError::Config(
                "max_conditions must be at least 1".to_string(),
            ));
        }
        if self.left_suffix == self.right_suffix {
            return Err(SiftError::Config(format!(
                "join suffixes must differ (both are '{}')",
                self.left_suffix
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = FilterConfig::default();
        assert_eq!(config.categorical_threshold, 50);
        assert_eq!(config.max_conditions, 5);
        assert_eq!(config.left_suffix, "_left");
        assert_eq!(config.right_suffix, "_right");
    }

    #[test]
    fn test_load_partial_json() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"categorical_threshold": 10}"#).unwrap();

        let config = FilterConfig::load(file.path()).unwrap();
        assert_eq!(config.categorical_threshold, 10);
        assert_eq!(config.max_conditions, 5);
    }

    #[test]
    fn test_rejects_equal_suffixes() {
        let config = FilterConfig::new().with_suffixes("_x", "_x");
        assert!(matches!(config.validate(), Err(SiftError::Config(_))));
    }
}
