//! Query conditions as entered by the user.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SiftError};
use crate::predicate::Operator;

/// Boolean combinator between two conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connective {
    And,
    Or,
}

impl FromStr for Connective {
    type Err = SiftError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "and" | "&" | "&&" => Ok(Connective::And),
            "or" | "|" | "||" => Ok(Connective::Or),
            other => Err(SiftError::Validation(format!(
                "unknown connective '{}' (expected 'and' or 'or')",
                other
            ))),
        }
    }
}

impl fmt::Display for Connective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Connective::And => f.write_str("and"),
            Connective::Or => f.write_str("or"),
        }
    }
}

/// One `{column, operator, value}` row of the query builder.
///
/// The value stays raw text until the query is compiled against a dataset,
/// where the column's kind decides how it is read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionSpec {
    pub column: String,
    pub operator: Operator,
    pub value: String,
}

impl ConditionSpec {
    pub fn new(column: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            operator,
            value: value.into(),
        }
    }

    /// Parse `column <op> value`, e.g. `age >= 30` or `home city == 'New York'`.
    ///
    /// The first whitespace-separated operator token splits column from value.
    /// Both sides keep their inner spacing; surrounding quotes on the value are removed.
    pub fn parse(text: &str) -> Result<Self> {
        let (op_start, op_end, operator) = tokens_with_offsets(text)
            .find_map(|(start, token)| {
                Operator::parse(token).map(|op| (start, start + token.len(), op))
            })
            .ok_or_else(|| {
                SiftError::Validation(format!("no operator found in condition '{}'", text))
            })?;

        let column = text[..op_start].trim();
        if column.is_empty() {
            return Err(SiftError::Validation(format!(
                "missing column in condition '{}'",
                text
            )));
        }

        let value = strip_quotes(text[op_end..].trim()).to_string();
        Ok(Self::new(column, operator, value))
    }
}

/// Whitespace-separated tokens with their byte offsets in `text`.
fn tokens_with_offsets(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.split_whitespace()
        .map(move |token| (token.as_ptr() as usize - text.as_ptr() as usize, token))
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['\'', '"'] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

/// Ordered conditions with a connective between each adjacent pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub conditions: Vec<ConditionSpec>,
    pub connectives: Vec<Connective>,
}

impl Query {
    /// Start a query with its first condition.
    pub fn new(first: ConditionSpec) -> Self {
        Self {
            conditions: vec![first],
            connectives: Vec::new(),
        }
    }

    /// Append a condition joined by `connective`.
    pub fn then(mut self, connective: Connective, condition: ConditionSpec) -> Self {
        self.connectives.push(connective);
        self.conditions.push(condition);
        self
    }

    /// Parse alternating terms: `cond [and|or cond]...`.
    pub fn from_terms<S: AsRef<str>>(terms: &[S]) -> Result<Self> {
        let mut query = Query::default();
        for (i, term) in terms.iter().enumerate() {
            let term = term.as_ref();
            if i % 2 == 0 {
                query.conditions.push(ConditionSpec::parse(term)?);
            } else {
                query.connectives.push(term.parse()?);
            }
        }
        if terms.len() % 2 == 0 {
            return Err(SiftError::Validation(
                "query must start and end with a condition".to_string(),
            ));
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_condition() {
        let c = ConditionSpec::parse("age > 30").unwrap();
        assert_eq!(c, ConditionSpec::new("age", Operator::Gt, "30"));

        let c = ConditionSpec::parse("home city == 'New York'").unwrap();
        assert_eq!(c.column, "home city");
        assert_eq!(c.value, "New York");

        let c = ConditionSpec::parse("city == 'New  York '").unwrap();
        assert_eq!(c.value, "New  York ");

        let c = ConditionSpec::parse("home  city != Los  Angeles").unwrap();
        assert_eq!(c.column, "home  city");
        assert_eq!(c.value, "Los  Angeles");

        let c = ConditionSpec::parse("name contains").unwrap();
        assert_eq!(c.operator, Operator::Contains);
        assert_eq!(c.value, "");
    }

    #[test]
    fn test_parse_condition_errors() {
        assert!(ConditionSpec::parse("age 30").is_err());
        assert!(ConditionSpec::parse("> 30").is_err());
    }

    #[test]
    fn test_query_from_terms() {
        let q = Query::from_terms(&["age > 30", "and", "city == NY"]).unwrap();
        assert_eq!(q.conditions.len(), 2);
        assert_eq!(q.connectives, vec![Connective::And]);

        assert!(Query::from_terms(&["age > 30", "and"]).is_err());
        assert!(Query::from_terms(&["age > 30", "xor", "city == NY"]).is_err());
    }
}
