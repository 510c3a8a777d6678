//! # Schema Strictness
//!
//! A schema is *strict* when its root object carries
//! `"additionalProperties": false`. Without it, JSON Schema accepts any
//! property the schema does not mention, so a payload with unexpected
//! fields would pass validation.
//!
//! Nested sub-schemas are not inspected. A strict root with permissive
//! children is still strict; a permissive root with strict children is not.

use std::fmt;

use serde_json::Value;

const KEYWORD: &str = "additionalProperties";

/// Returns `true` iff `schema` is an object whose root-level
/// `additionalProperties` is the boolean `false`.
pub fn is_strict(schema: &Value) -> bool {
    matches!(schema.get(KEYWORD), Some(Value::Bool(false)))
}

/// Parse raw bytes and run [`is_strict`] on the result.
///
/// Malformed JSON is not strict; this function never fails.
pub fn is_strict_document(raw: &[u8]) -> bool {
    serde_json::from_slice::<Value>(raw)
        .map(|schema| is_strict(&schema))
        .unwrap_or(false)
}

/// Why a schema failed the strictness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StrictnessFinding {
    /// The schema document is not a JSON object (e.g. `true` or an array).
    NotAnObject,
    /// The root has no `additionalProperties` key (JSON Schema treats this as `true`).
    Absent,
    /// The root sets `additionalProperties: true`.
    ExplicitlyAllowed,
    /// The root constrains additional properties with a sub-schema
    /// instead of forbidding them.
    SubSchema,
    /// The keyword is present with a non-boolean, non-object value.
    UnexpectedValue(String),
}

impl fmt::Display for StrictnessFinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotAnObject => write!(f, "schema is not a JSON object"),
            Self::Absent => write!(f, "'{KEYWORD}' is absent (defaults to true)"),
            Self::ExplicitlyAllowed => write!(f, "'{KEYWORD}' is set to true"),
            Self::SubSchema => write!(f, "'{KEYWORD}' is a sub-schema, not false"),
            Self::UnexpectedValue(v) => write!(f, "'{KEYWORD}' has unexpected value {v}"),
        }
    }
}

/// Explain why `schema` is not strict.
///
/// Returns `None` exactly when [`is_strict`] returns `true`.
pub fn strictness_finding(schema: &Value) -> Option<StrictnessFinding> {
    let Some(root) = schema.as_object() else {
        return Some(StrictnessFinding::NotAnObject);
    };
    match root.get(KEYWORD) {
        Some(Value::Bool(false)) => None,
        Some(Value::Bool(true)) => Some(StrictnessFinding::ExplicitlyAllowed),
        Some(Value::Object(_)) => Some(StrictnessFinding::SubSchema),
        Some(other) => Some(StrictnessFinding::UnexpectedValue(other.to_string())),
        None => Some(StrictnessFinding::Absent),
    }
}
