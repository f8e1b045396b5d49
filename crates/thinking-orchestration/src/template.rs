//! Reference substitution in step inputs.
//!
//! A string leaf of a step's `input` is a reference only when the whole
//! string has one of these shapes:
//!
//! - `$name`: field `name` of the workflow's initial input, where `name` is
//!   made of ASCII letters, digits, `_` and `-`.
//! - `key.field` or `$key.field`: field `field` of the output stored under
//!   `key`, where `key` is the store key of some step of the same workflow.
//! - `{{expr}}`: `expr` is any of the above, with optional whitespace.
//!
//! A `{{...}}` wrapper or a `$key.field` whose contents match nothing is
//! kept as [`Reference::Unresolvable`] and fails at resolution. Everything
//! else is a literal. Substitution is purely syntactic.

use serde_json::Value;
use thinking_protocols::{ToolInput, value_kind};

use crate::definition::WorkflowStep;
use crate::error::StepError;
use crate::result::StepStatus;
use crate::store::{Lookup, ResultStore};

/// A parsed reference expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `$name`
    Input(&'a str),
    /// `key.field`; `field` is everything after the first dot.
    Output { key: &'a str, field: &'a str },
    /// Template syntax that names neither an input field nor a store key.
    Unresolvable(&'a str),
}

fn is_identifier(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Classify a string value. `is_store_key` decides which `key.` prefixes are
/// output references.
pub fn classify<'a>(raw: &'a str, is_store_key: impl Fn(&str) -> bool) -> Option<Reference<'a>> {
    if let Some(inner) = raw.strip_prefix("{{").and_then(|r| r.strip_suffix("}}")) {
        let inner = inner.trim();
        let expr = inner.strip_prefix('$').unwrap_or(inner);
        let reference = if is_identifier(expr) {
            Some(Reference::Input(expr))
        } else {
            output(expr, &is_store_key)
        };
        return Some(reference.unwrap_or(Reference::Unresolvable(raw)));
    }

    if let Some(rest) = raw.strip_prefix('$') {
        if is_identifier(rest) {
            return Some(Reference::Input(rest));
        }
        return match rest.split_once('.') {
            Some((key, _)) if is_identifier(key) => {
                Some(output(rest, &is_store_key).unwrap_or(Reference::Unresolvable(raw)))
            }
            _ => None,
        };
    }

    output(raw, &is_store_key)
}

fn output<'a>(expr: &'a str, is_store_key: &impl Fn(&str) -> bool) -> Option<Reference<'a>> {
    match expr.split_once('.') {
        Some((key, field)) if !key.is_empty() && is_store_key(key) => {
            Some(Reference::Output { key, field })
        }
        _ => None,
    }
}

/// Every reference found anywhere inside `input`.
pub fn references<'a>(input: &'a ToolInput, is_store_key: &dyn Fn(&str) -> bool) -> Vec<Reference<'a>> {
    let mut found = Vec::new();
    for value in input.values() {
        collect(value, is_store_key, &mut found);
    }
    found
}

fn collect<'a>(value: &'a Value, is_store_key: &dyn Fn(&str) -> bool, found: &mut Vec<Reference<'a>>) {
    match value {
        Value::String(s) => {
            if let Some(reference) = classify(s, is_store_key) {
                found.push(reference);
            }
        }
        Value::Array(items) => items.iter().for_each(|v| collect(v, is_store_key, found)),
        Value::Object(map) => map.values().for_each(|v| collect(v, is_store_key, found)),
        _ => {}
    }
}

/// Builds a step's concrete input.
pub struct TemplateResolver;

impl TemplateResolver {
    /// Substitute every reference in `template`.
    ///
    /// Literals pass through unchanged; nested arrays and objects are walked.
    pub fn resolve(
        template: &ToolInput,
        initial: &ToolInput,
        store: &ResultStore,
    ) -> Result<ToolInput, StepError> {
        Self::resolve_map(template, initial, store, &|key: &str| store.is_declared(key))
    }

    /// Resolve `step`'s input. The step's own store key is never a
    /// reference there, so `report.txt` stays literal in a step storing as
    /// `report`.
    pub fn resolve_step(
        step: &WorkflowStep,
        initial: &ToolInput,
        store: &ResultStore,
    ) -> Result<ToolInput, StepError> {
        let own = step.store_key();
        Self::resolve_map(&step.input, initial, store, &|key: &str| {
            key != own && store.is_declared(key)
        })
    }

    fn resolve_map(
        template: &ToolInput,
        initial: &ToolInput,
        store: &ResultStore,
        is_store_key: &dyn Fn(&str) -> bool,
    ) -> Result<ToolInput, StepError> {
        template
            .iter()
            .map(|(name, value)| {
                Self::resolve_value(value, initial, store, is_store_key).map(|v| (name.clone(), v))
            })
            .collect()
    }

    fn resolve_value(
        value: &Value,
        initial: &ToolInput,
        store: &ResultStore,
        is_store_key: &dyn Fn(&str) -> bool,
    ) -> Result<Value, StepError> {
        match value {
            Value::String(s) => match classify(s, is_store_key) {
                Some(reference) => Self::resolve_reference(reference, initial, store),
                None => Ok(value.clone()),
            },
            Value::Array(items) => items
                .iter()
                .map(|v| Self::resolve_value(v, initial, store, is_store_key))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Value::Object(map) => map
                .iter()
                .map(|(k, v)| {
                    Self::resolve_value(v, initial, store, is_store_key).map(|v| (k.clone(), v))
                })
                .collect::<Result<serde_json::Map<_, _>, _>>()
                .map(Value::Object),
            _ => Ok(value.clone()),
        }
    }

    fn resolve_reference(
        reference: Reference<'_>,
        initial: &ToolInput,
        store: &ResultStore,
    ) -> Result<Value, StepError> {
        match reference {
            Reference::Unresolvable(raw) => Err(StepError::Resolution(format!(
                "cannot resolve '{}': no initial input field or declared store key matches",
                raw
            ))),
            Reference::Input(name) => initial.get(name).cloned().ok_or_else(|| {
                StepError::Resolution(format!("initial input has no field '{}'", name))
            }),
            Reference::Output { key, field } => {
                if field.is_empty() || field.contains('.') {
                    return Err(StepError::Resolution(format!(
                        "unsupported reference '{}.{}': expected exactly one field after the store key",
                        key, field
                    )));
                }
                match store.lookup(key) {
                    Lookup::Available(Value::Object(map)) => map.get(field).cloned().ok_or_else(|| {
                        StepError::Resolution(format!("output '{}' has no field '{}'", key, field))
                    }),
                    Lookup::Available(other) => Err(StepError::Resolution(format!(
                        "output '{}' is a {}, cannot project field '{}'",
                        key,
                        value_kind(other),
                        field
                    ))),
                    Lookup::Unavailable { step_id, status } => {
                        let why = match status {
                            Some(StepStatus::Skipped) => "was skipped",
                            Some(StepStatus::Failed) => "failed",
                            _ => "has not completed",
                        };
                        Err(StepError::Resolution(format!(
                            "output '{}' is unavailable: step '{}' {}",
                            key, step_id, why
                        )))
                    }
                    Lookup::Undeclared => Err(StepError::Resolution(format!(
                        "no step stores its result as '{}'",
                        key
                    ))),
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
