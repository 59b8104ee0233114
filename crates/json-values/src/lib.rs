//! JSON conversions for value-core types.
//!
//! This crate is the dynamic conversion engine: it maps arbitrary nested JSON
//! into [`TypedValue`](value_core::TypedValue) trees and projects typed values
//! back into plain JSON.
//!
//! # Modules
//!
//! - [`forward`] - TypedValue → JSON value conversion
//! - [`reverse`] - JSON value → TypedValue conversion
//!
//! # Example
//!
//! ```rust
//! use json_values::{decode, encode, DecodeContext};
//! use value_core::ValueType;
//!
//! let raw = serde_json::json!({"date": ["2025-10-02"]});
//! let tv = decode(&raw, &mut DecodeContext::new()).unwrap();
//! assert_eq!(
//!     tv.get("date").map(|v| v.value_type()),
//!     Some(ValueType::list(ValueType::String))
//! );
//! assert_eq!(encode(&tv), raw);
//! ```

pub mod forward;
pub mod reverse;

pub use forward::{canonicalize, encode, encode_object, to_canonical_text, JsonValue};
pub use reverse::{
    decode, decode_as, decode_object, json_kind, ConversionError, DecodeContext,
    JsonValueWithType, DEFAULT_MAX_DEPTH,
};
