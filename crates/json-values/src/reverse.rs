//! Reverse conversion: JSON value → TypedValue.
//!
//! Two entry points:
//!
//! - [`decode`] converts a raw JSON value with no schema applied. Types are
//!   inferred bottom-up from the data.
//! - [`JsonValueWithType`] converts a raw JSON value against an expected
//!   [`ValueType`], coercing numbers where the hint allows it and reporting
//!   mismatches with the JSON path that failed.

use std::collections::BTreeMap;
use std::fmt;
use value_core::{Diagnostic, Diagnostics, ListValue, ObjectValue, TypedValue, ValueType};

/// Default limit on nesting depth (matches serde_json's own recursion limit).
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Errors raised while converting JSON into typed values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConversionError {
    /// Nesting deeper than the context allows
    #[error("value at {path} exceeds the maximum nesting depth of {max_depth}")]
    DepthExceeded { path: String, max_depth: usize },

    /// Raw value does not match the expected type
    #[error("expected {expected} at {path}, found {found}")]
    TypeMismatch {
        path: String,
        expected: ValueType,
        found: &'static str,
    },

    /// Number not representable as either i64 or f64
    #[error("number at {path} is out of range: {number}")]
    NumberOutOfRange { path: String, number: String },
}

impl From<ConversionError> for Diagnostic {
    fn from(err: ConversionError) -> Self {
        Diagnostic::error("Value Conversion Error", err.to_string())
    }
}

impl From<ConversionError> for Diagnostics {
    fn from(err: ConversionError) -> Self {
        Diagnostics::from(Diagnostic::from(err))
    }
}

#[derive(Debug, Clone)]
enum PathSegment {
    Field(String),
    Index(usize),
}

/// Decoding context: the JSON path of the value being decoded and the
/// nesting limit.
#[derive(Debug, Clone)]
pub struct DecodeContext {
    root: String,
    path: Vec<PathSegment>,
    max_depth: usize,
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self {
            root: "$".to_string(),
            path: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl DecodeContext {
    /// Create a context rooted at `$`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context rooted at a named field, e.g. `notifications`.
    pub fn at(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Current nesting depth.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Render the current path, e.g. `$.rows[2].date`.
    pub fn path(&self) -> String {
        self.to_string()
    }

    fn scoped<T>(&mut self, segment: PathSegment, f: impl FnOnce(&mut Self) -> T) -> T {
        self.path.push(segment);
        let out = f(self);
        self.path.pop();
        out
    }

    fn check_depth(&self) -> Result<(), ConversionError> {
        if self.depth() > self.max_depth {
            return Err(ConversionError::DepthExceeded {
                path: self.path(),
                max_depth: self.max_depth,
            });
        }
        Ok(())
    }

    fn mismatch(&self, expected: &ValueType, raw: &serde_json::Value) -> ConversionError {
        ConversionError::TypeMismatch {
            path: self.path(),
            expected: expected.clone(),
            found: json_kind(raw),
        }
    }
}

impl fmt::Display for DecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        for segment in &self.path {
            match segment {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Name of the JSON kind of a raw value, for error messages.
pub fn json_kind(raw: &serde_json::Value) -> &'static str {
    match raw {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "float",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Decode a raw JSON value with no schema applied.
///
/// - `null` becomes a null typed as string.
/// - Integers become `Int64`; float-shaped numbers stay `Float64`.
/// - An empty list is declared as a list of strings. A non-empty list is
///   declared with the type of its *last* element; each element keeps the
///   variant it decoded to.
/// - Objects get exactly the decoded per-key types as their field table.
pub fn decode(raw: &serde_json::Value, ctx: &mut DecodeContext) -> Result<TypedValue, Diagnostics> {
    decode_value(raw, ctx).map_err(Diagnostics::from)
}

pub(crate) fn decode_value(
    raw: &serde_json::Value,
    ctx: &mut DecodeContext,
) -> Result<TypedValue, ConversionError> {
    ctx.check_depth()?;
    match raw {
        serde_json::Value::Null => Ok(TypedValue::null(ValueType::String)),
        serde_json::Value::Bool(b) => Ok(TypedValue::Bool(*b)),
        serde_json::Value::Number(n) => decode_number(n, ctx),
        serde_json::Value::String(s) => Ok(TypedValue::String(s.clone())),
        serde_json::Value::Array(items) => {
            let mut element_type = ValueType::String;
            let mut elements = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let element = ctx.scoped(PathSegment::Index(i), |ctx| decode_value(item, ctx))?;
                element_type = element.value_type();
                elements.push(element);
            }
            Ok(ListValue::with_declared_type(element_type, elements).into())
        }
        serde_json::Value::Object(map) => Ok(decode_object(map, ctx)?.into()),
    }
}

/// Decode a JSON object with no schema applied.
pub fn decode_object(
    map: &serde_json::Map<String, serde_json::Value>,
    ctx: &mut DecodeContext,
) -> Result<ObjectValue, ConversionError> {
    let mut fields = BTreeMap::new();
    for (key, value) in map {
        let decoded = ctx.scoped(PathSegment::Field(key.clone()), |ctx| {
            decode_value(value, ctx)
        })?;
        fields.insert(key.clone(), decoded);
    }
    Ok(ObjectValue::from_fields(fields))
}

fn decode_number(
    n: &serde_json::Number,
    ctx: &DecodeContext,
) -> Result<TypedValue, ConversionError> {
    if let Some(i) = n.as_i64() {
        return Ok(TypedValue::Int64(i));
    }
    // u64 values above i64::MAX land here as well
    match n.as_f64() {
        Some(f) => Ok(TypedValue::Float64(f)),
        None => Err(ConversionError::NumberOutOfRange {
            path: ctx.path(),
            number: n.to_string(),
        }),
    }
}

/// JSON value paired with an expected type for hint-directed conversion.
#[derive(Debug, Clone)]
pub struct JsonValueWithType {
    /// The JSON value.
    pub value: serde_json::Value,
    /// The expected type.
    pub value_type: ValueType,
}

impl JsonValueWithType {
    /// Create a new JsonValueWithType.
    pub fn new(value: serde_json::Value, value_type: ValueType) -> Self {
        Self { value, value_type }
    }

    /// Convert to TypedValue, reporting the first mismatch.
    pub fn to_typed_value(&self, ctx: &mut DecodeContext) -> Result<TypedValue, ConversionError> {
        decode_as(&self.value, &self.value_type, ctx)
    }
}

/// Decode a raw JSON value against an expected type.
///
/// Object hints decode only the declared fields; a declared field missing
/// from the input becomes a typed null. Undeclared input keys are ignored.
pub fn decode_as(
    raw: &serde_json::Value,
    expected: &ValueType,
    ctx: &mut DecodeContext,
) -> Result<TypedValue, ConversionError> {
    ctx.check_depth()?;
    match (expected, raw) {
        (ty, serde_json::Value::Null) => Ok(TypedValue::null(ty.clone())),

        (ValueType::Dynamic, value) => Ok(TypedValue::dynamic(decode_value(value, ctx)?)),

        (ValueType::String, serde_json::Value::String(s)) => Ok(TypedValue::String(s.clone())),

        (ValueType::Bool, serde_json::Value::Bool(b)) => Ok(TypedValue::Bool(*b)),

        (ValueType::Int64, serde_json::Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                return Ok(TypedValue::Int64(i));
            }
            match n.as_f64() {
                Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                    Ok(TypedValue::Int64(f as i64))
                }
                _ => Err(ctx.mismatch(expected, raw)),
            }
        }

        (ValueType::Float64, serde_json::Value::Number(n)) => match n.as_f64() {
            Some(f) => Ok(TypedValue::Float64(f)),
            None => Err(ConversionError::NumberOutOfRange {
                path: ctx.path(),
                number: n.to_string(),
            }),
        },

        (ValueType::List(element_type), serde_json::Value::Array(items)) => {
            let mut elements = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let element = ctx.scoped(PathSegment::Index(i), |ctx| {
                    decode_as(item, element_type, ctx)
                })?;
                elements.push(element);
            }
            Ok(ListValue::with_declared_type((**element_type).clone(), elements).into())
        }

        (ValueType::Object(field_types), serde_json::Value::Object(map)) => {
            let mut fields = BTreeMap::new();
            for (name, field_type) in field_types {
                let decoded = match map.get(name) {
                    Some(value) => ctx.scoped(PathSegment::Field(name.clone()), |ctx| {
                        decode_as(value, field_type, ctx)
                    })?,
                    None => TypedValue::null(field_type.clone()),
                };
                fields.insert(name.clone(), decoded);
            }
            Ok(ObjectValue::from_fields(fields).into())
        }

        (expected, raw) => Err(ctx.mismatch(expected, raw)),
    }
}
