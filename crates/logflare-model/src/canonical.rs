//! Free-form JSON fields exchanged with the host as text.

use crate::error::MappingError;
use json_values::{decode, decode_as, encode, json_kind, to_canonical_text, DecodeContext};
use serde::{Deserialize, Serialize};
use value_core::{TypedValue, ValueType};

/// JSON document held as text.
///
/// Values coming back from the server are stored in canonical form (sorted
/// keys, no insignificant whitespace). Text supplied by the caller is kept
/// as written and only parsed when a request body is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonText(String);

impl JsonText {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Canonical `{}`.
    pub fn empty_object() -> Self {
        Self("{}".to_string())
    }

    /// Canonical text of a raw JSON value.
    pub fn from_value(value: &serde_json::Value) -> Self {
        Self(to_canonical_text(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the text into a raw JSON value.
    pub fn parse(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.0)
    }

    /// Canonical form of this text.
    pub fn normalized(&self) -> Result<Self, serde_json::Error> {
        self.parse().map(|v| Self::from_value(&v))
    }

    /// Compare by JSON meaning rather than by text; falls back to text
    /// equality when either side does not parse.
    pub fn semantically_equals(&self, other: &JsonText) -> bool {
        match (self.parse(), other.parse()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.0 == other.0,
        }
    }

    /// Typed view of the document, or `None` when the text is not JSON.
    pub fn to_typed(&self) -> Option<TypedValue> {
        let raw = self.parse().ok()?;
        decode(&raw, &mut DecodeContext::new()).ok()
    }

    /// Decode into the mapping embedded in a request body.
    pub fn to_object(
        &self,
        field: &'static str,
    ) -> Result<serde_json::Map<String, serde_json::Value>, MappingError> {
        let raw = self
            .parse()
            .map_err(|source| MappingError::InvalidJson { field, source })?;
        let typed = decode_as(&raw, &ValueType::Dynamic, &mut DecodeContext::at(field))
            .map_err(|source| MappingError::Conversion { field, source })?;
        if typed.as_object().is_none() {
            return Err(MappingError::NotAnObject {
                field,
                found: json_kind(&raw),
            });
        }
        match encode(&typed) {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(MappingError::NotAnObject {
                field,
                found: json_kind(&other),
            }),
        }
    }
}

impl From<&str> for JsonText {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_is_canonical() {
        let text = JsonText::from_value(&json!({"b": 1, "a": [true]}));
        assert_eq!(text.as_str(), r#"{"a":[true],"b":1}"#);
    }

    #[test]
    fn test_semantic_equality_ignores_whitespace_and_order() {
        let a = JsonText::new("{ \"x\": 1, \"y\": 2 }");
        let b = JsonText::new(r#"{"y":2,"x":1}"#);
        assert!(a.semantically_equals(&b));
        assert_ne!(a, b);
        assert_eq!(a.normalized().unwrap(), b.normalized().unwrap());
    }

    #[test]
    fn test_to_object() {
        let map = JsonText::new(r#"{"a": {"b": [1, 2]}}"#).to_object("metrics").unwrap();
        assert_eq!(serde_json::Value::Object(map), json!({"a": {"b": [1, 2]}}));
    }

    #[test]
    fn test_to_object_rejects_malformed_text() {
        let err = JsonText::new("{not json").to_object("metrics").unwrap_err();
        assert!(matches!(err, MappingError::InvalidJson { field: "metrics", .. }));
    }

    #[test]
    fn test_to_object_rejects_non_object() {
        let err = JsonText::new("[1, 2]").to_object("source_mapping").unwrap_err();
        assert_eq!(
            err.to_string(),
            "field 'source_mapping' must be a JSON object, found array"
        );
    }
}
