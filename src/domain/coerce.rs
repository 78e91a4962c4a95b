//! Field coercion: turn arbitrary JSON into a value of the expected kind.
//!
//! Every function here is total. A raw value that cannot be read as the
//! expected kind is replaced by the fallback, never reported as an error.

use serde_json::{Map, Value};

use crate::domain::schema::{FieldDescriptor, FieldKind};

/// Coerce `raw` to the runtime type of `fallback`.
///
/// - missing or `null` yields the fallback
/// - booleans, numbers and strings are accepted only as the same literal kind
/// - lists accept arrays (non-strings dropped) or objects (string values kept)
/// - objects are rebuilt key by key from the fallback, dropping unknown keys
pub fn sanitize_field(raw: Option<&Value>, fallback: &Value) -> Value {
    let Some(raw) = raw.filter(|value| !value.is_null()) else {
        return fallback.clone();
    };

    match fallback {
        Value::Bool(_) if raw.is_boolean() => raw.clone(),
        Value::Number(expected) => match raw {
            Value::Number(actual) if number_fits(actual, expected) => raw.clone(),
            _ => fallback.clone(),
        },
        Value::String(_) if raw.is_string() => raw.clone(),
        Value::Array(_) => string_list(raw).map(Value::Array).unwrap_or_else(|| fallback.clone()),
        Value::Object(defaults) => match raw {
            Value::Object(map) => Value::Object(
                defaults
                    .iter()
                    .map(|(key, default)| (key.clone(), sanitize_field(map.get(key), default)))
                    .collect(),
            ),
            _ => fallback.clone(),
        },
        _ => fallback.clone(),
    }
}

/// Descriptor-aware coercion with an explicit fallback.
///
/// Same rules as [`sanitize_field`], plus enum membership. Objects walk the
/// descriptor's fields; a field missing from `fallback` uses its default.
pub fn sanitize_against(
    raw: Option<&Value>,
    fallback: &Value,
    descriptor: &FieldDescriptor,
) -> Value {
    match &descriptor.kind {
        FieldKind::Enum { allowed } => match raw {
            Some(Value::String(text)) if allowed.contains(text) => Value::String(text.clone()),
            _ => fallback.clone(),
        },
        FieldKind::Object { fields } => {
            let raw_map = raw.and_then(Value::as_object);
            let mut out = Map::with_capacity(fields.len());
            for field in fields {
                let field_fallback = fallback.get(&field.name).unwrap_or(&field.default);
                let field_raw = raw_map.and_then(|map| map.get(&field.name));
                out.insert(field.name.clone(), sanitize_against(field_raw, field_fallback, field));
            }
            Value::Object(out)
        }
        _ => sanitize_field(raw, fallback),
    }
}

/// Coerce `raw` against the descriptor's own default.
pub fn sanitize_with(raw: Option<&Value>, descriptor: &FieldDescriptor) -> Value {
    sanitize_against(raw, &descriptor.default, descriptor)
}

/// Read a list of strings from an array or from an object's values.
pub fn string_list(raw: &Value) -> Option<Vec<Value>> {
    match raw {
        Value::Array(items) => Some(items.iter().filter(|value| value.is_string()).cloned().collect()),
        Value::Object(map) => Some(map.values().filter(|value| value.is_string()).cloned().collect()),
        _ => None,
    }
}

fn number_fits(actual: &serde_json::Number, expected: &serde_json::Number) -> bool {
    if expected.is_u64() {
        actual.is_u64()
    } else if expected.is_i64() {
        actual.as_i64().is_some()
    } else {
        true
    }
}

/// Value at a key path.
pub(crate) fn value_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |current, key| current.get(*key))
}

/// Replace the value at a key path, creating intermediate objects.
pub(crate) fn set_at(value: &mut Value, path: &[&str], next: Value) {
    let Some((last, parents)) = path.split_last() else {
        *value = next;
        return;
    };
    let mut current = value;
    for key in parents {
        if !current.is_object() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => {
                map.entry(key.to_string()).or_insert_with(|| Value::Object(Map::new()))
            }
            _ => return,
        };
    }
    if !current.is_object() {
        *current = Value::Object(Map::new());
    }
    if let Value::Object(map) = current {
        map.insert(last.to_string(), next);
    }
}
