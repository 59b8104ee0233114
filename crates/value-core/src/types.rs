//! Type universe for dynamically-shaped values.
//!
//! `ValueType` describes the shape of a [`TypedValue`](crate::TypedValue)
//! without looking at its contents. Lists carry their declared element type
//! and objects carry their full field-type table, so an empty list or a null
//! object still reports a meaningful type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Declared type of a typed value.
///
/// Two object types are equal only when their field tables are equal: an
/// object with fields `{a, b}` is a different type from one with `{a}` even if
/// the shared field `a` has the same type in both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "of", rename_all = "snake_case")]
pub enum ValueType {
    /// UTF-8 string
    String,

    /// 64-bit signed integer
    Int64,

    /// 64-bit IEEE 754 floating point
    Float64,

    /// Boolean
    Bool,

    /// Homogeneous list with a declared element type
    List(Box<ValueType>),

    /// Object with a fixed field-name-to-type table
    Object(BTreeMap<String, ValueType>),

    /// Type erased until runtime; any value may be wrapped
    Dynamic,
}

impl ValueType {
    /// Create a list type with the given element type.
    pub fn list(element_type: ValueType) -> Self {
        Self::List(Box::new(element_type))
    }

    /// Create an object type from `(name, type)` pairs.
    pub fn object<I, K>(fields: I) -> Self
    where
        I: IntoIterator<Item = (K, ValueType)>,
        K: Into<String>,
    {
        Self::Object(fields.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    /// Element type of a list type.
    pub fn element_type(&self) -> Option<&ValueType> {
        match self {
            Self::List(element_type) => Some(element_type),
            _ => None,
        }
    }

    /// Field-type table of an object type.
    pub fn field_types(&self) -> Option<&BTreeMap<String, ValueType>> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// Check if this type is a scalar (string, integer, float or bool).
    pub fn is_scalar(&self) -> bool {
        matches!(self, Self::String | Self::Int64 | Self::Float64 | Self::Bool)
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String => write!(f, "string"),
            Self::Int64 => write!(f, "int64"),
            Self::Float64 => write!(f, "float64"),
            Self::Bool => write!(f, "bool"),
            Self::List(element_type) => write!(f, "list[{element_type}]"),
            Self::Object(fields) => {
                write!(f, "object{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {ty}")?;
                }
                write!(f, "}}")
            }
            Self::Dynamic => write!(f, "dynamic"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(
            ValueType::list(ValueType::Int64),
            ValueType::List(Box::new(ValueType::Int64))
        );
        let obj = ValueType::object([("a", ValueType::String), ("b", ValueType::Bool)]);
        assert_eq!(obj.field_types().map(|f| f.len()), Some(2));
        assert_eq!(obj.element_type(), None);
    }

    #[test]
    fn test_object_identity_includes_field_set() {
        let narrow = ValueType::object([("a", ValueType::String)]);
        let wide = ValueType::object([("a", ValueType::String), ("b", ValueType::String)]);
        assert_ne!(narrow, wide);
    }

    #[test]
    fn test_display() {
        assert_eq!(ValueType::list(ValueType::String).to_string(), "list[string]");
        assert_eq!(
            ValueType::object([("id", ValueType::Int64), ("tags", ValueType::list(ValueType::Dynamic))])
                .to_string(),
            "object{id: int64, tags: list[dynamic]}"
        );
    }

    #[test]
    fn test_serde_roundtrip() {
        let ty = ValueType::object([
            ("name", ValueType::String),
            ("ids", ValueType::list(ValueType::Int64)),
        ]);
        let text = serde_json::to_string(&ty).unwrap();
        let parsed: ValueType = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, ty);
    }
}
