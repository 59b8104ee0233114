//! Forward conversion: TypedValue → JSON value.
//!
//! Encoding strips dynamic wrappers and declared-type metadata and yields
//! the structurally equivalent raw JSON value.

use serde_json::json;
use value_core::{ObjectValue, TypedValue};

/// Wrapper for JSON values.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonValue(pub serde_json::Value);

impl JsonValue {
    /// Get the inner JSON value.
    pub fn into_inner(self) -> serde_json::Value {
        self.0
    }

    /// Get a reference to the inner JSON value.
    pub fn as_inner(&self) -> &serde_json::Value {
        &self.0
    }
}

impl From<&TypedValue> for JsonValue {
    fn from(tv: &TypedValue) -> Self {
        JsonValue(encode(tv))
    }
}

impl From<TypedValue> for JsonValue {
    fn from(tv: TypedValue) -> Self {
        JsonValue(encode(&tv))
    }
}

/// Project a typed value back into a plain JSON value.
pub fn encode(value: &TypedValue) -> serde_json::Value {
    match value {
        TypedValue::Null(_) => serde_json::Value::Null,
        TypedValue::String(s) => json!(s),
        TypedValue::Int64(i) => json!(*i),
        // Non-finite floats have no JSON form
        TypedValue::Float64(f) => serde_json::Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        TypedValue::Bool(b) => json!(*b),
        TypedValue::List(list) => {
            serde_json::Value::Array(list.elements().iter().map(encode).collect())
        }
        TypedValue::Object(obj) => {
            let map = obj
                .fields()
                .iter()
                .map(|(k, v)| (k.clone(), encode(v)))
                .collect();
            serde_json::Value::Object(map)
        }
        TypedValue::Dynamic(inner) => encode(inner),
    }
}

/// Encode an object into a JSON map, omitting null fields.
///
/// Used when building request bodies: an unset field is left out so the
/// server applies its own default instead of receiving an explicit null.
pub fn encode_object(obj: &ObjectValue) -> serde_json::Map<String, serde_json::Value> {
    obj.fields()
        .iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), encode(v)))
        .collect()
}

/// Rebuild a JSON value with every object's keys in sorted order.
pub fn canonicalize(value: &serde_json::Value) -> serde_json::Value {
    match value {
        serde_json::Value::Array(items) => {
            serde_json::Value::Array(items.iter().map(canonicalize).collect())
        }
        serde_json::Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let mut sorted = serde_json::Map::new();
            for key in keys {
                if let Some(v) = map.get(key) {
                    sorted.insert(key.clone(), canonicalize(v));
                }
            }
            serde_json::Value::Object(sorted)
        }
        other => other.clone(),
    }
}

/// Render a JSON value as canonical text: sorted keys, no insignificant
/// whitespace.
pub fn to_canonical_text(value: &serde_json::Value) -> String {
    canonicalize(value).to_string()
}
