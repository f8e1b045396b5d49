//! Step run-conditions.

use serde_json::Value;
use thinking_protocols::value_kind;

use crate::definition::{ConditionOperator, StepCondition};
use crate::error::StepError;
use crate::store::ResultStore;

/// Decides whether a gated step runs.
pub struct ConditionEvaluator;

impl ConditionEvaluator {
    /// Evaluate `condition` against the outputs stored so far.
    ///
    /// `None` always runs. A source step that was skipped or failed, or a
    /// field that is absent, evaluates to `false`. Ordering operators on a
    /// non-numeric field are an error.
    pub fn evaluate(condition: Option<&StepCondition>, store: &ResultStore) -> Result<bool, StepError> {
        let Some(condition) = condition else {
            return Ok(true);
        };

        let Some(output) = store.output_of(&condition.source_step) else {
            return Ok(false);
        };

        let actual = if condition.field.is_empty() {
            output
        } else {
            match output {
                Value::Object(map) => match map.get(&condition.field) {
                    Some(value) => value,
                    None => return Ok(false),
                },
                other => {
                    return Err(StepError::Condition(format!(
                        "result of step '{}' is a {}, cannot project field '{}'",
                        condition.source_step,
                        value_kind(other),
                        condition.field
                    )));
                }
            }
        };

        Self::compare(&condition.operator, actual, &condition.value, condition)
    }

    fn compare(
        operator: &ConditionOperator,
        actual: &Value,
        expected: &Value,
        condition: &StepCondition,
    ) -> Result<bool, StepError> {
        match operator {
            ConditionOperator::Gt
            | ConditionOperator::Gte
            | ConditionOperator::Lt
            | ConditionOperator::Lte => {
                let (Some(a), Some(b)) = (actual.as_f64(), expected.as_f64()) else {
                    return Err(StepError::Condition(format!(
                        "operator '{}' needs numbers, field '{}' is a {}",
                        operator,
                        condition.field,
                        value_kind(actual)
                    )));
                };
                Ok(match operator {
                    ConditionOperator::Gt => a > b,
                    ConditionOperator::Gte => a >= b,
                    ConditionOperator::Lt => a < b,
                    _ => a <= b,
                })
            }
            ConditionOperator::Eq => Ok(values_equal(actual, expected)),
            ConditionOperator::Ne => Ok(!values_equal(actual, expected)),
            ConditionOperator::Contains => Ok(contains(actual, expected)),
            ConditionOperator::Unknown(raw) => Err(StepError::Condition(format!(
                "unknown operator '{}'",
                raw
            ))),
        }
    }
}

/// Structural equality where numbers compare by value (`1 == 1.0`).
fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        _ => a == b,
    }
}

/// Substring for strings, membership for lists, key presence for objects.
fn contains(haystack: &Value, needle: &Value) -> bool {
    match (haystack, needle) {
        (Value::String(s), Value::String(sub)) => !sub.is_empty() && s.contains(sub.as_str()),
        (Value::Array(items), needle) => items.iter().any(|item| values_equal(item, needle)),
        (Value::Object(map), Value::String(key)) => map.contains_key(key),
        _ => false,
    }
}
