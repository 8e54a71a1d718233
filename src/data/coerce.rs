//! Strict numeric coercion of loosely typed JSON request fields.
//!
//! Request bodies come from form-driven front-ends, so numbers frequently arrive as
//! strings (`"6"`, `" 12.5 "`). Those are accepted. Anything else that is not a
//! finite number (booleans, arrays, objects, `"abc"`, `"inf"`) is rejected with
//! [`PharmsimError::InvalidNumericInput`]. `null` is treated as an absent field.

use serde_json::{Map, Value};

use crate::error::PharmsimError;

/// Coerce a single JSON value to a finite `f64`.
pub fn to_number(field: &str, value: &Value) -> Result<f64, PharmsimError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(x) if x.is_finite() => Ok(x),
        _ => Err(PharmsimError::invalid_numeric(field, value)),
    }
}

/// Look up `key` and coerce it. Missing keys and `null` yield `Ok(None)`.
pub fn number(fields: &Map<String, Value>, key: &str) -> Result<Option<f64>, PharmsimError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(value) => to_number(key, value).map(Some),
    }
}

/// Like [`number`], trying each key in order and returning the first present one.
pub fn first_number(
    fields: &Map<String, Value>,
    keys: &[&str],
) -> Result<Option<f64>, PharmsimError> {
    for key in keys {
        if let Some(x) = number(fields, key)? {
            return Ok(Some(x));
        }
    }
    Ok(None)
}

/// Look up a string-valued field. Numbers are rendered to text; other types are rejected.
pub fn text(fields: &Map<String, Value>, key: &str) -> Result<Option<String>, PharmsimError> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(PharmsimError::invalid_numeric(key, other)),
    }
}
