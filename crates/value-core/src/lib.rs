//! Core types for logflare-reconcile.
//!
//! This crate provides the foundational types shared by the conversion
//! engine, the resource mappers and the reconciliation controller:
//!
//! - [`ValueType`] - Declared type of a dynamically-shaped value
//! - [`TypedValue`] - Tagged-union value carrying explicit type information
//! - [`Diagnostic`] / [`Diagnostics`] - Severity-tagged operation results
//!
//! # Architecture
//!
//! ```text
//! value-core (this crate)
//!    │
//!    ├─── json-values       (decode/encode between JSON and TypedValue)
//!    ├─── logflare-model    (record <-> wire schema mappers)
//!    └─── reconcile         (CRUD controller, returns Diagnostics)
//! ```
//!
//! # Example
//!
//! ```rust
//! use value_core::{ListValue, TypedValue, ValueType};
//!
//! let empty = TypedValue::from(ListValue::empty(ValueType::String));
//! assert_eq!(empty.value_type(), ValueType::list(ValueType::String));
//! ```

pub mod diagnostics;
pub mod types;
pub mod values;

pub use diagnostics::{redact_text, Diagnostic, Diagnostics, Severity, REDACTED};
pub use types::ValueType;
pub use values::{ListValue, ObjectBuilder, ObjectValue, TypedValue, ValueError};
