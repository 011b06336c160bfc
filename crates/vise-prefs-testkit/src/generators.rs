//! Proptest generators for property-based testing.

use proptest::prelude::*;

use vise_prefs_core::Value;

/// Generate a preference key.
pub fn key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,15}".prop_map(String::from)
}

/// Generate blob bytes of specified max length.
pub fn blob(max_len: usize) -> impl Strategy<Value = Value> {
    prop::collection::vec(any::<u8>(), 0..=max_len).prop_map(Value::from)
}

/// Generate a finite float.
///
/// Restricted to finite values; non-finite floats are unencodable.
pub fn float() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1e15f64..1e15f64,
        Just(0.0),
        Just(-0.5),
        Just(f64::MIN_POSITIVE),
        Just(f64::MAX),
    ]
}

/// Generate a non-container value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Int),
        float().prop_map(Value::Float),
        any::<String>().prop_map(Value::Text),
        blob(256),
    ]
}

/// Generate any encodable value, nesting lists and maps a few levels deep.
pub fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(4, 48, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::List),
            prop::collection::btree_map(key(), inner, 0..8).prop_map(Value::Map),
        ]
    })
}
