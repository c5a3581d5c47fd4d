//! Compiles query builder conditions into a typed predicate.

use crate::config::FilterConfig;
use crate::dataset::{parse_datetime, Dataset};
use crate::error::{Result, SiftError};
use crate::predicate::{ConditionValue, Operator, Predicate};
use crate::schema::{classify, ColumnKind};

use super::condition::{ConditionSpec, Connective, Query};

/// Compile `query` against the columns of `dataset`.
///
/// Conditions on text-valued columns with an empty value are dropped, along
/// with the connective preceding them. Each kept condition joins the
/// conditions before it left to right, so `a or b and c` is `(a or b) and c`.
/// Returns `Ok(None)` when every condition was dropped.
pub fn compile(
    dataset: &Dataset,
    query: &Query,
    config: &FilterConfig,
) -> Result<Option<Predicate>> {
    let count = query.conditions.len();
    if count == 0 || count > config.max_conditions {
        return Err(SiftError::Validation(format!(
            "a query needs between 1 and {} conditions, got {}",
            config.max_conditions, count
        )));
    }
    if query.connectives.len() + 1 != count {
        return Err(SiftError::Validation(format!(
            "{} conditions need {} connectives, got {}",
            count,
            count - 1,
            query.connectives.len()
        )));
    }

    let info = classify(dataset);
    let mut compiled: Option<Predicate> = None;

    for (i, condition) in query.conditions.iter().enumerate() {
        let kind = info
            .kind_of(&condition.column)
            .ok_or_else(|| SiftError::ColumnNotFound(condition.column.clone()))?;

        let Some(leaf) = compile_condition(condition, kind)? else {
            log::debug!("dropping condition {} on '{}': empty value", i + 1, condition.column);
            continue;
        };

        compiled = Some(match compiled {
            None => leaf,
            Some(acc) => match query.connectives[i - 1] {
                Connective::And => acc.and(leaf),
                Connective::Or => acc.or(leaf),
            },
        });
    }

    Ok(compiled)
}

fn compile_condition(
    condition: &ConditionSpec,
    kind: ColumnKind,
) -> Result<Option<Predicate>> {
    let ConditionSpec {
        column,
        operator,
        value,
    } = condition;

    let allowed = match kind {
        ColumnKind::Numeric => Operator::NUMERIC,
        ColumnKind::Categorical => Operator::CATEGORICAL,
        ColumnKind::Datetime | ColumnKind::Other => Operator::EQUALITY,
    };
    if !allowed.contains(operator) {
        let names: Vec<&str> = allowed.iter().map(Operator::symbol).collect();
        return Err(SiftError::Validation(format!(
            "operator '{}' is not allowed on column '{}' (allowed: {})",
            operator,
            column,
            names.join(", ")
        )));
    }

    let literal = match kind {
        ColumnKind::Numeric => {
            let number = value.trim().parse::<f64>().map_err(|_| {
                SiftError::Validation(format!(
                    "value '{}' for numeric column '{}' is not a number",
                    value, column
                ))
            })?;
            ConditionValue::Number(number)
        }
        _ if value.is_empty() => return Ok(None),
        ColumnKind::Datetime => {
            let at = parse_datetime(value).ok_or_else(|| {
                SiftError::Evaluation(format!(
                    "cannot compare datetime column '{}' with '{}'",
                    column, value
                ))
            })?;
            ConditionValue::Date(at)
        }
        ColumnKind::Categorical | ColumnKind::Other => ConditionValue::Text(value.clone()),
    };

    Ok(Some(Predicate::compare(column.clone(), *operator, literal)))
}
