//! Evaluation of individual field checks.
//!
//! Each check either holds, fails with a message, or raises a defect. Input
//! problems raised by helpers (`InvalidInput`) are turned into failures here;
//! only defects escape to the engine.

use crate::helpers::{HelperCall, HelperCatalog};
use crate::registry::SchemaRegistry;
use crate::utils::general::{
    as_number, as_text, check_range, conforms, length_of, normalize, render_message,
};
use schemas_core::{ComputationError, Constraint, FieldType, Payload, ValidationRule, Value};

/// The field value under evaluation.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// Field name
    pub field: &'a str,
    /// Field value, never null
    pub value: &'a Value,
    /// Whole payload
    pub payload: &'a Payload,
}

/// Checks the semantic type of a value.
///
/// Returns the failure message on mismatch.
pub fn check_type(field_type: FieldType, value: &Value) -> Option<String> {
    if conforms(value, field_type) {
        None
    } else {
        Some(format!("expected {}, got {}", field_type, value.type_name()))
    }
}

/// Evaluates one rule.
///
/// Returns `Ok(None)` when the rule holds and `Ok(Some(message))` when it
/// fails. `Err` is reserved for defects.
pub fn check_rule(
    rule: &ValidationRule,
    ctx: &RuleContext<'_>,
    registry: &SchemaRegistry,
    helpers: &HelperCatalog,
) -> Result<Option<String>, ComputationError> {
    let failure = match evaluate(&rule.constraint, ctx, registry, helpers) {
        Ok(failure) => failure,
        Err(err) if err.is_defect() => return Err(err),
        Err(err) => Some(err.message),
    };

    Ok(failure.map(|detail| match &rule.message {
        Some(template) => render_message(template, ctx.field, ctx.value),
        None => detail,
    }))
}

fn evaluate(
    constraint: &Constraint,
    ctx: &RuleContext<'_>,
    registry: &SchemaRegistry,
    helpers: &HelperCatalog,
) -> Result<Option<String>, ComputationError> {
    match constraint {
        Constraint::AllowedValues {
            values,
            case_insensitive,
        } => {
            let text = as_text(ctx.value)?;
            let found = if *case_insensitive {
                let needle = normalize(&text);
                values.iter().any(|v| normalize(v) == needle)
            } else {
                values.iter().any(|v| *v == text)
            };
            Ok((!found).then(|| {
                format!(
                    "value '{}' is not one of [{}]",
                    text,
                    values.join(", ")
                )
            }))
        }

        Constraint::Range { min, max } => {
            let number = as_number(ctx.value)?;
            if check_range(number, *min, *max) {
                return Ok(None);
            }
            Ok(Some(match (min, max) {
                (Some(min), _) if number < *min => {
                    format!("value {} is below the minimum of {}", ctx.value, min)
                }
                (_, Some(max)) => format!("value {} is above the maximum of {}", ctx.value, max),
                _ => format!("value {} is out of range", ctx.value),
            }))
        }

        Constraint::Pattern { regex } => {
            let text = as_text(ctx.value)?;
            let compiled = registry.pattern(regex).ok_or_else(|| {
                ComputationError::defect("pattern", format!("pattern '{}' was never compiled", regex))
            })?;
            Ok((!compiled.is_match(&text))
                .then(|| format!("value '{}' does not match pattern '{}'", text, regex)))
        }

        Constraint::Length { min, max } => {
            let len = length_of(ctx.value)?;
            if min.is_some_and(|min| len < min) {
                return Ok(Some(format!(
                    "length {} is below the minimum of {}",
                    len,
                    min.unwrap_or_default()
                )));
            }
            if max.is_some_and(|max| len > max) {
                return Ok(Some(format!(
                    "length {} is above the maximum of {}",
                    len,
                    max.unwrap_or_default()
                )));
            }
            Ok(None)
        }

        Constraint::Helper { name, args } => {
            let call = HelperCall {
                helper: name,
                field: ctx.field,
                value: ctx.value,
                payload: ctx.payload,
                args,
            };
            let held = helpers.call(&call)?;
            Ok((!held).then(|| format!("value '{}' failed check '{}'", ctx.value, name)))
        }
    }
}
