//! Schema field descriptors.

use serde::Serialize;
use serde_json::Value;

use super::EnumField;

/// Expected kind of a configuration field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum FieldKind {
    String,
    Boolean,
    Number,
    Enum { allowed: Vec<String> },
    StringList,
    Object { fields: Vec<FieldDescriptor> },
}

impl FieldKind {
    pub fn label(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Number => "number",
            FieldKind::Enum { .. } => "enum",
            FieldKind::StringList => "string[]",
            FieldKind::Object { .. } => "object",
        }
    }
}

/// Name, kind and default value of one field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldDescriptor {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
    pub default: Value,
}

impl FieldDescriptor {
    /// Derive a descriptor from a default value, marking enum paths.
    pub(crate) fn from_default<'a>(
        name: &'a str,
        default: &'a Value,
        path: &mut Vec<&'a str>,
        enums: &[EnumField],
    ) -> Self {
        let kind = match default {
            Value::Bool(_) => FieldKind::Boolean,
            Value::Number(_) => FieldKind::Number,
            Value::String(_) => match enums.iter().find(|field| field.path == path.as_slice()) {
                Some(field) => FieldKind::Enum {
                    allowed: field.allowed.iter().map(|value| value.to_string()).collect(),
                },
                None => FieldKind::String,
            },
            Value::Array(_) => FieldKind::StringList,
            Value::Object(map) => {
                let mut fields = Vec::with_capacity(map.len());
                for (key, value) in map {
                    path.push(key);
                    fields.push(FieldDescriptor::from_default(key, value, path, enums));
                    path.pop();
                }
                FieldKind::Object { fields }
            }
            // Optional fields never appear in resolved defaults.
            Value::Null => FieldKind::String,
        };
        Self { name: name.to_string(), kind, default: default.clone() }
    }

    /// Direct child of an object descriptor.
    pub fn child(&self, name: &str) -> Option<&FieldDescriptor> {
        match &self.kind {
            FieldKind::Object { fields } => fields.iter().find(|field| field.name == name),
            _ => None,
        }
    }

    /// Descendant at a key path; the empty path is `self`.
    pub fn at(&self, path: &[&str]) -> Option<&FieldDescriptor> {
        path.iter().try_fold(self, |descriptor, key| descriptor.child(key))
    }

    /// Whether `value` has this descriptor's kind (recursively for objects).
    pub fn matches(&self, value: &Value) -> bool {
        match (&self.kind, value) {
            (FieldKind::String, Value::String(_)) => true,
            (FieldKind::Boolean, Value::Bool(_)) => true,
            (FieldKind::Number, Value::Number(_)) => true,
            (FieldKind::Enum { allowed }, Value::String(text)) => allowed.contains(text),
            (FieldKind::StringList, Value::Array(items)) => items.iter().all(Value::is_string),
            (FieldKind::Object { fields }, Value::Object(map)) => {
                map.len() == fields.len()
                    && fields.iter().all(|field| {
                        map.get(&field.name).map(|value| field.matches(value)).unwrap_or(false)
                    })
            }
            _ => false,
        }
    }

    /// Defaults satisfy their own kind constraints.
    pub fn is_self_consistent(&self) -> bool {
        self.matches(&self.default)
    }

    /// Leaf fields in declaration order, with dotted paths.
    pub fn leaves(&self) -> Vec<(String, &FieldDescriptor)> {
        let mut out = Vec::new();
        self.collect_leaves("", &mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, prefix: &str, out: &mut Vec<(String, &'a FieldDescriptor)>) {
        let path = match (prefix.is_empty(), self.name.is_empty()) {
            (true, _) => self.name.clone(),
            (false, true) => prefix.to_string(),
            (false, false) => format!("{}.{}", prefix, self.name),
        };
        match &self.kind {
            FieldKind::Object { fields } => {
                for field in fields {
                    field.collect_leaves(&path, out);
                }
            }
            _ => out.push((path, self)),
        }
    }
}
