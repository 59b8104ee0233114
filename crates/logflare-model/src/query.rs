//! Endpoint query data source: rows returned by a saved endpoint.

use crate::fields::FieldSpec;
use crate::sensitive::Sensitive;
use json_values::{decode_object, to_canonical_text, DecodeContext};
use serde::{Deserialize, Serialize};
use value_core::{Diagnostics, ListValue, TypedValue, ValueType};

pub const ENDPOINT_QUERY_FIELDS: &[FieldSpec] = &[
    FieldSpec::user("name_or_token").sensitive(),
    FieldSpec::computed("result"),
];

/// State of an endpoint query read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointQueryRecord {
    pub name_or_token: Sensitive<String>,
    #[serde(default)]
    pub result: Option<TypedValue>,
}

impl EndpointQueryRecord {
    pub fn new(name_or_token: impl Into<String>) -> Self {
        Self {
            name_or_token: Sensitive::new(name_or_token.into()),
            result: None,
        }
    }
}

/// Response envelope of `GET /api/endpoints/query/{name_or_token}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QueryEnvelope {
    pub result: Option<Vec<serde_json::Map<String, serde_json::Value>>>,
    pub error: Option<serde_json::Value>,
}

impl QueryEnvelope {
    /// Remote error text, if the envelope carries one.
    pub fn error_message(&self) -> Option<String> {
        match &self.error {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(message)) => Some(message.clone()),
            Some(serde_json::Value::Object(map)) => match map.get("message") {
                Some(serde_json::Value::String(message)) => Some(message.clone()),
                _ => Some(to_canonical_text(&serde_json::Value::Object(map.clone()))),
            },
            Some(other) => Some(to_canonical_text(other)),
        }
    }
}

/// Decode result rows into a dynamic list of dynamic objects.
///
/// Each row is decoded schema-less, so rows may differ in shape.
pub fn decode_rows(
    rows: &[serde_json::Map<String, serde_json::Value>],
) -> Result<TypedValue, Diagnostics> {
    let mut elements = Vec::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        let mut ctx = DecodeContext::at(format!("result[{i}]"));
        let object = decode_object(row, &mut ctx)?;
        elements.push(TypedValue::dynamic(object.into()));
    }
    let list = ListValue::with_declared_type(ValueType::Dynamic, elements);
    Ok(TypedValue::dynamic(list.into()))
}
