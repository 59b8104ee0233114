//! Mapping error types.

use json_values::ConversionError;
use value_core::{Diagnostic, Diagnostics};

/// Errors raised while mapping between records and wire schemas.
///
/// Messages name the field and, where safe, the offending value. Sensitive
/// fields are plain strings on the wire and never reach these variants.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    /// Required field left empty
    #[error("required field '{0}' is not set")]
    MissingRequired(&'static str),

    /// Free-form field text is not JSON
    #[error("field '{field}' is not valid JSON: {source}")]
    InvalidJson {
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Free-form field is JSON but not a mapping
    #[error("field '{field}' must be a JSON object, found {found}")]
    NotAnObject {
        field: &'static str,
        found: &'static str,
    },

    /// Integer does not fit the record's 32-bit field
    #[error("field '{field}' value {value} does not fit in a 32-bit integer")]
    OutOfRange { field: &'static str, value: i64 },

    /// Timestamp in an unrecognised format
    #[error("field '{field}' has an unrecognised timestamp: {value}")]
    InvalidTimestamp { field: &'static str, value: String },

    /// Nested value failed schema-directed conversion
    #[error("field '{field}': {source}")]
    Conversion {
        field: &'static str,
        #[source]
        source: ConversionError,
    },
}

impl MappingError {
    /// Field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::MissingRequired(field) => field,
            Self::InvalidJson { field, .. }
            | Self::NotAnObject { field, .. }
            | Self::OutOfRange { field, .. }
            | Self::InvalidTimestamp { field, .. }
            | Self::Conversion { field, .. } => field,
        }
    }
}

impl From<MappingError> for Diagnostic {
    fn from(err: MappingError) -> Self {
        let summary = match &err {
            MappingError::MissingRequired(_) => "Missing Required Attribute".to_string(),
            other => format!("Can't convert '{}' field", other.field()),
        };
        Diagnostic::error(summary, err.to_string())
    }
}

impl From<MappingError> for Diagnostics {
    fn from(err: MappingError) -> Self {
        Diagnostics::from(Diagnostic::from(err))
    }
}
