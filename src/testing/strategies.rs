//! Proptest strategies over untyped JSON.

use proptest::prelude::*;
use serde_json::{Map, Value};

use crate::domain::migration::LegacyField;

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        (0u64..20).prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-zA-Z0-9# _-]{0,12}".prop_map(Value::String),
        prop::sample::select(vec!["crm", "schedule", "#fff", "e-commerce", "postgresql", "none", "0 2 * * *"])
            .prop_map(Value::from),
    ]
}

/// Arbitrary JSON up to a few levels deep.
pub(crate) fn arb_json() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
            prop::collection::btree_map("[a-zA-Z]{1,8}", inner, 0..5)
                .prop_map(|map| Value::Object(map.into_iter().collect::<Map<String, Value>>())),
        ]
    })
}

/// Objects built from a schema's legacy keys with arbitrary values.
pub(crate) fn legacy_blob(fields: &'static [LegacyField]) -> impl Strategy<Value = Value> {
    let keys: Vec<&'static str> = fields.iter().map(|field| field.from).collect();
    prop::collection::vec((prop::sample::select(keys), arb_json()), 0..8).prop_map(|pairs| {
        Value::Object(pairs.into_iter().map(|(key, value)| (key.to_string(), value)).collect())
    })
}
