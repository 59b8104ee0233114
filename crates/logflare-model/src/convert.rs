//! Field-level conversions shared by the record mappers.

use crate::canonical::JsonText;
use crate::error::MappingError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use value_core::{TypedValue, ValueType};

/// Naive formats accepted when a timestamp carries no offset; read as UTC.
const NAIVE_TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Narrow a host integer into a 32-bit wire field.
pub(crate) fn narrow_i32(field: &'static str, value: Option<i64>) -> Result<Option<i32>, MappingError> {
    value
        .map(|v| i32::try_from(v).map_err(|_| MappingError::OutOfRange { field, value: v }))
        .transpose()
}

pub(crate) fn widen_i32(value: Option<i32>) -> Option<i64> {
    value.map(i64::from)
}

/// Render a wire timestamp as RFC 3339 with second precision.
///
/// Offsets are preserved; a UTC offset renders as `Z`.
pub(crate) fn normalize_timestamp(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, MappingError> {
    let Some(raw) = value else {
        return Ok(None);
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true)));
    }

    for format in NAIVE_TIMESTAMP_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            let dt = DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc);
            return Ok(Some(dt.to_rfc3339_opts(SecondsFormat::Secs, true)));
        }
    }

    Err(MappingError::InvalidTimestamp {
        field,
        value: raw.to_string(),
    })
}

/// Wire form of a free-form field; `None` stays absent from the body.
pub(crate) fn free_form_to_wire(
    field: &'static str,
    value: Option<&JsonText>,
) -> Result<Option<serde_json::Map<String, serde_json::Value>>, MappingError> {
    value.map(|text| text.to_object(field)).transpose()
}

/// Record form of a free-form field; an absent mapping becomes `{}`.
pub(crate) fn free_form_from_wire(
    value: Option<serde_json::Map<String, serde_json::Value>>,
) -> JsonText {
    match value {
        Some(map) => JsonText::from_value(&serde_json::Value::Object(map)),
        None => JsonText::empty_object(),
    }
}

pub(crate) fn string_value(value: Option<&str>) -> TypedValue {
    value.map_or(TypedValue::null(ValueType::String), TypedValue::string)
}

pub(crate) fn int_value(value: Option<i64>) -> TypedValue {
    value.map_or(TypedValue::null(ValueType::Int64), TypedValue::Int64)
}

pub(crate) fn bool_value(value: Option<bool>) -> TypedValue {
    value.map_or(TypedValue::null(ValueType::Bool), TypedValue::Bool)
}

/// Typed view of a free-form field. Text that does not parse is carried as
/// a plain string so drift on it is still visible.
pub(crate) fn free_form_value(value: Option<&JsonText>) -> TypedValue {
    match value {
        None => TypedValue::null(ValueType::Dynamic),
        Some(text) => match text.to_typed() {
            Some(typed) => TypedValue::dynamic(typed),
            None => TypedValue::dynamic(TypedValue::string(text.as_str())),
        },
    }
}
