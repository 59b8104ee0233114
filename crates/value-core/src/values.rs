//! Typed value representation.
//!
//! `TypedValue` is the tagged union every dynamically-shaped payload is
//! converted into. Each node carries enough type information to report its
//! own [`ValueType`] without inspecting children.

use crate::types::ValueType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors raised when constructing container values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValueError {
    /// A list element does not match the declared element type
    #[error("list element {index} has type {found}, expected {expected}")]
    ElementType {
        index: usize,
        expected: ValueType,
        found: ValueType,
    },

    /// An object field value does not match its declared type
    #[error("field '{field}' has type {found}, expected {expected}")]
    FieldType {
        field: String,
        expected: ValueType,
        found: ValueType,
    },

    /// Field table and values name different fields
    #[error("field '{0}' is declared but has no value")]
    MissingField(String),

    /// A value was supplied for a field that is not declared
    #[error("field '{0}' has a value but is not declared")]
    UndeclaredField(String),
}

/// A value with explicit type information per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypedValue {
    /// Null value of the given type
    Null(ValueType),

    /// String value
    String(String),

    /// 64-bit signed integer
    Int64(i64),

    /// 64-bit floating point
    Float64(f64),

    /// Boolean value
    Bool(bool),

    /// List with a declared element type
    List(ListValue),

    /// Object with a field-type table
    Object(ObjectValue),

    /// Value whose static type is erased
    Dynamic(Box<TypedValue>),
}

impl TypedValue {
    /// Create a null value of the given type.
    pub fn null(value_type: ValueType) -> Self {
        Self::Null(value_type)
    }

    /// Create a string value.
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Wrap a value so its static type is erased.
    pub fn dynamic(value: TypedValue) -> Self {
        Self::Dynamic(Box::new(value))
    }

    /// Report the declared type of this value.
    ///
    /// A null reports the type it is a null of; a dynamic wrapper reports
    /// [`ValueType::Dynamic`] regardless of what it wraps.
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Null(value_type) => value_type.clone(),
            Self::String(_) => ValueType::String,
            Self::Int64(_) => ValueType::Int64,
            Self::Float64(_) => ValueType::Float64,
            Self::Bool(_) => ValueType::Bool,
            Self::List(list) => ValueType::list(list.element_type.clone()),
            Self::Object(obj) => ValueType::Object(obj.field_types.clone()),
            Self::Dynamic(_) => ValueType::Dynamic,
        }
    }

    /// Check if this value is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }

    /// Strip any number of dynamic wrappers.
    pub fn unwrap_dynamic(&self) -> &TypedValue {
        let mut current = self;
        while let Self::Dynamic(inner) = current {
            current = inner;
        }
        current
    }

    /// Try to get this value as a string reference.
    pub fn as_str(&self) -> Option<&str> {
        match self.unwrap_dynamic() {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as an i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self.unwrap_dynamic() {
            Self::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Try to get this value as an f64.
    pub fn as_f64(&self) -> Option<f64> {
        match self.unwrap_dynamic() {
            Self::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self.unwrap_dynamic() {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Try to get this value as a list.
    pub fn as_list(&self) -> Option<&ListValue> {
        match self.unwrap_dynamic() {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Try to get this value as an object.
    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self.unwrap_dynamic() {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Look up a field when this value is an object.
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.as_object().and_then(|obj| obj.get(field))
    }
}

impl From<ListValue> for TypedValue {
    fn from(list: ListValue) -> Self {
        Self::List(list)
    }
}

impl From<ObjectValue> for TypedValue {
    fn from(obj: ObjectValue) -> Self {
        Self::Object(obj)
    }
}

/// List value with a declared element type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListValue {
    element_type: ValueType,
    elements: Vec<TypedValue>,
}

impl ListValue {
    /// Create a list, checking every element against the element type.
    pub fn new(element_type: ValueType, elements: Vec<TypedValue>) -> Result<Self, ValueError> {
        for (index, element) in elements.iter().enumerate() {
            let found = element.value_type();
            if found != element_type {
                return Err(ValueError::ElementType {
                    index,
                    expected: element_type,
                    found,
                });
            }
        }
        Ok(Self {
            element_type,
            elements,
        })
    }

    /// Create a list with a declared element type, keeping each element's own
    /// variant as-is.
    ///
    /// Used by the schema-less decoder, which declares the list type from the
    /// last decoded element.
    pub fn with_declared_type(element_type: ValueType, elements: Vec<TypedValue>) -> Self {
        Self {
            element_type,
            elements,
        }
    }

    /// Create an empty list of the given element type.
    pub fn empty(element_type: ValueType) -> Self {
        Self::with_declared_type(element_type, Vec::new())
    }

    /// Declared element type.
    pub fn element_type(&self) -> &ValueType {
        &self.element_type
    }

    /// List elements.
    pub fn elements(&self) -> &[TypedValue] {
        &self.elements
    }

    /// Consume the list and return its elements.
    pub fn into_elements(self) -> Vec<TypedValue> {
        self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the list has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Check whether every element matches the declared element type.
    pub fn is_homogeneous(&self) -> bool {
        self.elements
            .iter()
            .all(|e| e.value_type() == self.element_type)
    }
}

/// Object value carrying its field-type table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectValue {
    field_types: BTreeMap<String, ValueType>,
    fields: BTreeMap<String, TypedValue>,
}

impl ObjectValue {
    /// Create an object whose field-type table is derived from the values.
    pub fn from_fields(fields: BTreeMap<String, TypedValue>) -> Self {
        let field_types = fields
            .iter()
            .map(|(name, value)| (name.clone(), value.value_type()))
            .collect();
        Self {
            field_types,
            fields,
        }
    }

    /// Create an object against an explicit field-type table.
    ///
    /// Every declared field needs a value of exactly the declared type; use a
    /// typed null for absent fields.
    pub fn new(
        field_types: BTreeMap<String, ValueType>,
        fields: BTreeMap<String, TypedValue>,
    ) -> Result<Self, ValueError> {
        if let Some(name) = fields.keys().find(|k| !field_types.contains_key(*k)) {
            return Err(ValueError::UndeclaredField(name.clone()));
        }
        for (name, expected) in &field_types {
            let value = fields
                .get(name)
                .ok_or_else(|| ValueError::MissingField(name.clone()))?;
            let found = value.value_type();
            if &found != expected {
                return Err(ValueError::FieldType {
                    field: name.clone(),
                    expected: expected.clone(),
                    found,
                });
            }
        }
        Ok(Self {
            field_types,
            fields,
        })
    }

    /// Field-type table.
    pub fn field_types(&self) -> &BTreeMap<String, ValueType> {
        &self.field_types
    }

    /// Field values.
    pub fn fields(&self) -> &BTreeMap<String, TypedValue> {
        &self.fields
    }

    /// Look up a field value.
    pub fn get(&self, field: &str) -> Option<&TypedValue> {
        self.fields.get(field)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the object has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Object type of this value.
    pub fn object_type(&self) -> ValueType {
        ValueType::Object(self.field_types.clone())
    }
}

/// Builder for objects with a fixed field set, used by record mappers.
#[derive(Debug, Default)]
pub struct ObjectBuilder {
    fields: BTreeMap<String, TypedValue>,
}

impl ObjectBuilder {
    /// Start an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field.
    pub fn field(mut self, name: impl Into<String>, value: TypedValue) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Build the object, deriving its field-type table from the values.
    pub fn build(self) -> ObjectValue {
        ObjectValue::from_fields(self.fields)
    }
}
