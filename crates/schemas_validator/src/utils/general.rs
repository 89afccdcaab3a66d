//! Domain-neutral coercions and checks.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use regex::Regex;
use schemas_core::{ComputationError, ComputationResult, FieldType, Value};
use url::Url;

/// Name of the semantic type a value has.
pub fn type_name(value: &Value) -> &'static str {
    value.type_name()
}

/// Whether a value conforms to a semantic field type.
///
/// Integral floats count as integers; timestamps are accepted as parsable
/// strings or epoch integers.
pub fn conforms(value: &Value, field_type: FieldType) -> bool {
    match field_type {
        FieldType::Any => true,
        FieldType::String => matches!(value, Value::String(_)),
        FieldType::Integer => match value {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite() && f.fract() == 0.0,
            _ => false,
        },
        FieldType::Number => matches!(value, Value::Int(_) | Value::Float(_)),
        FieldType::Boolean => matches!(value, Value::Bool(_)),
        FieldType::Timestamp => match value {
            Value::String(s) => parse_timestamp(s).is_ok(),
            Value::Int(_) => true,
            _ => false,
        },
        FieldType::Map => matches!(value, Value::Map(_)),
        FieldType::List => matches!(value, Value::List(_)),
    }
}

/// Numeric view of a value.
pub fn as_number(value: &Value) -> ComputationResult<f64> {
    value.as_float().ok_or_else(|| {
        ComputationError::invalid_input(
            "general.as_number",
            format!("expected a number, got {}", value.type_name()),
        )
    })
}

/// Integer view of a value. Integral floats count, as they do for
/// [`conforms`].
pub fn as_integer(value: &Value) -> ComputationResult<i64> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
            Ok(*f as i64)
        }
        other => Err(ComputationError::invalid_input(
            "general.as_integer",
            format!("expected an integer, got {}", other),
        )),
    }
}

/// Textual view of a scalar value.
///
/// Lists and maps have no textual view.
pub fn as_text(value: &Value) -> ComputationResult<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Int(_) | Value::Float(_) | Value::Bool(_) => Ok(value.to_string()),
        other => Err(ComputationError::invalid_input(
            "general.as_text",
            format!("expected a scalar, got {}", other.type_name()),
        )),
    }
}

/// Whether `number` lies within the inclusive bounds.
pub fn check_range(number: f64, min: Option<f64>, max: Option<f64>) -> bool {
    min.is_none_or(|min| number >= min) && max.is_none_or(|max| number <= max)
}

/// Length of a string (in characters), list or map.
pub fn length_of(value: &Value) -> ComputationResult<usize> {
    match value {
        Value::String(s) => Ok(s.chars().count()),
        Value::List(items) => Ok(items.len()),
        Value::Map(map) => Ok(map.len()),
        other => Err(ComputationError::invalid_input(
            "general.length_of",
            format!("{} has no length", other.type_name()),
        )),
    }
}

/// Trims and lower-cases text for case-insensitive comparison.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// Parses a timestamp string in multiple formats.
///
/// Supports:
/// - RFC 3339 (e.g., "2024-01-15T10:30:00Z")
/// - Unix epoch seconds (e.g., "1705318200")
/// - Unix epoch milliseconds (e.g., "1705318200000")
/// - Date only (e.g., "2024-01-15")
/// - Date and time without zone (e.g., "2024-01-15 10:30:00")
pub fn parse_timestamp(text: &str) -> ComputationResult<DateTime<Utc>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(epoch) = text.parse::<i64>() {
        let parsed = if epoch > 10_000_000_000 {
            DateTime::from_timestamp_millis(epoch)
        } else {
            DateTime::from_timestamp(epoch, 0)
        };
        if let Some(dt) = parsed {
            return Ok(dt);
        }
    }

    if let Ok(naive) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S") {
        return Ok(DateTime::from_naive_utc_and_offset(naive, Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(DateTime::from_naive_utc_and_offset(
            date.and_time(NaiveTime::MIN),
            Utc,
        ));
    }

    Err(ComputationError::invalid_input(
        "general.parse_timestamp",
        format!(
            "invalid timestamp '{}'; supported formats: RFC 3339, Unix epoch (seconds/milliseconds), YYYY-MM-DD, YYYY-MM-DD HH:MM:SS",
            text
        ),
    ))
}

/// Compiles a regular expression that must match the whole value.
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})$", pattern))
}

/// Whether text is an absolute http(s) URL.
pub fn is_valid_url(text: &str) -> bool {
    Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
}

/// Fills `{field}` and `{value}` placeholders in a message template.
pub fn render_message(template: &str, field: &str, value: &Value) -> String {
    template
        .replace("{field}", field)
        .replace("{value}", &value.to_string())
}
