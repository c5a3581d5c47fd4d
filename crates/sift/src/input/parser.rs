//! CSV/TSV parser with delimiter detection and column typing.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::dataset::{parse_datetime, Column, Dataset, Value};
use crate::error::{Result, SiftError};
use crate::schema::DataType;

use super::source::SourceMetadata;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

// Quick shape check before handing a value to chrono.
static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}[-/]\d{2}[-/]\d{2}([ T]\d{2}:\d{2}(:\d{2})?)?$").unwrap());

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses delimited text files into typed datasets.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the dataset and its source metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| SiftError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };
        let dataset = self.parse_bytes(&contents, delimiter)?;
        let metadata = SourceMetadata::describe(path, &contents, delimiter, &dataset);

        log::debug!("parsed {}", metadata.summary());
        Ok((dataset, metadata))
    }

    /// Parse delimited text held in memory.
    pub fn parse_str(&self, text: &str) -> Result<Dataset> {
        let bytes = text.as_bytes();
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };
        self.parse_bytes(bytes, delimiter)
    }

    fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<Dataset> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if self.config.max_rows.is_some_and(|max| row_idx >= max) {
                break;
            }
            let record = result?;
            rows.push(record.iter().map(|s| s.to_string()).collect());
        }

        let headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.trim().to_string()).collect()
        } else {
            let width = rows.first().map_or(0, Vec::len);
            (0..width).map(|i| format!("column_{}", i + 1)).collect()
        };

        if headers.is_empty() {
            return Err(SiftError::EmptyData("No columns found".to_string()));
        }

        let columns = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw: Vec<&str> = rows
                    .iter()
                    .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                    .collect();
                build_column(name, &raw)
            })
            .collect();

        Dataset::new(columns)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a raw cell represents a missing value.
pub fn is_null_value(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("na")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
        || trimmed.eq_ignore_ascii_case("none")
        || trimmed.eq_ignore_ascii_case("nil")
        || trimmed == "."
        || trimmed == "-"
}

/// Infer the narrowest data type every non-null value fits.
fn infer_data_type(raw: &[&str]) -> DataType {
    let present: Vec<&str> = raw
        .iter()
        .map(|s| s.trim())
        .filter(|s| !is_null_value(s))
        .collect();

    if present.is_empty() {
        return DataType::Text;
    }
    if present.iter().all(|s| s.parse::<i64>().is_ok()) {
        DataType::Integer
    } else if present.iter().all(|s| s.parse::<f64>().is_ok()) {
        DataType::Float
    } else if present.iter().all(|s| parse_bool(s).is_some()) {
        DataType::Boolean
    } else if present
        .iter()
        .all(|s| DATE_PATTERN.is_match(s) && parse_datetime(s).is_some())
    {
        DataType::DateTime
    } else {
        DataType::Text
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn build_column(name: &str, raw: &[&str]) -> Column {
    let data_type = infer_data_type(raw);
    let values = raw
        .iter()
        .map(|cell| {
            let trimmed = cell.trim();
            if is_null_value(trimmed) {
                return Value::Null;
            }
            // Inference guarantees every present cell parses.
            match data_type {
                DataType::Integer => trimmed.parse().map_or(Value::Null, Value::Int),
                DataType::Float => trimmed.parse().map_or(Value::Null, Value::Float),
                DataType::Boolean => parse_bool(trimmed).map_or(Value::Null, Value::Bool),
                DataType::DateTime => parse_datetime(trimmed).map_or(Value::Null, Value::DateTime),
                DataType::Text => Value::Text((*cell).to_string()),
            }
        })
        .collect();
    Column::new(name, data_type, values)
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(SiftError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Consistent counts across lines win; tab breaks ties.
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
