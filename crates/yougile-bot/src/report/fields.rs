//! Lenient accessors over untyped model output.
//!
//! Absent keys never fail: missing objects behave as empty objects, missing
//! lists as empty lists, missing scalars as a caller-supplied placeholder.

use serde_json::Value;

static MISSING: Value = Value::Null;

/// Placeholder for missing scalar fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Nested value at `key`; `Null` (behaving as an empty object) when absent.
pub fn object<'a>(value: &'a Value, key: &str) -> &'a Value {
    value.get(key).unwrap_or(&MISSING)
}

/// List at `key`; empty when absent or not a list.
pub fn list<'a>(value: &'a Value, key: &str) -> &'a [Value] {
    value
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// Scalar at `key` rendered for display, or `default` when absent or null.
pub fn text(value: &Value, key: &str, default: &str) -> String {
    match value.get(key) {
        None | Some(Value::Null) => default.to_string(),
        Some(found) => display(found),
    }
}

/// Display form of a value: strings without quotes, everything else as JSON.
pub fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
