//! Null removal before serialization.

use serde_json::Value;

/// Recursively drops null-valued object fields.
///
/// Array elements are kept in place; objects nested in arrays are pruned.
#[must_use]
pub fn prune_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, prune_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(prune_nulls).collect()),
        other => other,
    }
}
