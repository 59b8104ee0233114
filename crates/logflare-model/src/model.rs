//! The `ResourceModel` trait implemented by every managed record.

use crate::fields::{FieldSpec, ResourceKind};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use value_core::{Diagnostics, ObjectValue};

/// A fixed-shape record managed through the CRUD lifecycle.
///
/// Implementations provide the two mapper directions plus a typed view of
/// the record used for drift detection and redaction.
pub trait ResourceModel:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Request/response body exchanged with the API.
    type Wire: Serialize + DeserializeOwned + fmt::Debug + Send + Sync;

    const KIND: ResourceKind;

    /// Field table, in declaration order.
    const FIELDS: &'static [FieldSpec];

    /// Identity token addressing the remote instance, if assigned.
    fn token(&self) -> Option<&str>;

    /// Build the request body. Unset optional fields are omitted.
    fn to_wire(&self) -> Result<Self::Wire, Diagnostics>;

    /// Merge a response into `existing`, overwriting server-owned fields.
    fn from_wire(wire: Self::Wire, existing: &Self) -> Result<Self, Diagnostics>;

    /// Typed view of every field; unset fields are typed nulls.
    fn to_value(&self) -> ObjectValue;

    /// Take server-computed fields that are unset here from `prior`.
    fn inherit_computed(self, prior: &Self) -> Self;
}

/// Current values of the record's sensitive fields, for redaction.
pub fn sensitive_values<R: ResourceModel>(record: &R) -> Vec<String> {
    let value = record.to_value();
    R::FIELDS
        .iter()
        .filter(|field| field.sensitive)
        .filter_map(|field| value.get(field.name))
        .filter_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Server-owned fields whose value differs between two versions of a record.
pub fn changed_server_fields<R: ResourceModel>(before: &R, after: &R) -> Vec<&'static str> {
    let before = before.to_value();
    let after = after.to_value();
    R::FIELDS
        .iter()
        .filter(|field| field.role.is_server_owned())
        .filter(|field| before.get(field.name) != after.get(field.name))
        .map(|field| field.name)
        .collect()
}
