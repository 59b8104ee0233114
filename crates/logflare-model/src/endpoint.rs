//! Endpoint resource: record, wire schema and mapper.

use crate::canonical::JsonText;
use crate::convert::{
    bool_value, free_form_from_wire, free_form_to_wire, free_form_value, int_value,
    narrow_i32, string_value, widen_i32,
};
use crate::error::MappingError;
use crate::fields::{FieldSpec, ResourceKind};
use crate::model::ResourceModel;
use crate::sensitive::Sensitive;
use crate::source::sensitive_value;
use serde::{Deserialize, Serialize};
use value_core::{Diagnostics, ObjectBuilder, ObjectValue, TypedValue};

pub const DEFAULT_CACHE_DURATION_SECONDS: i32 = 3600;
pub const DEFAULT_ENABLE_AUTH: bool = true;
pub const DEFAULT_MAX_LIMIT: i32 = 1000;
pub const DEFAULT_PROACTIVE_REQUERYING_SECONDS: i32 = 1800;
pub const DEFAULT_SANDBOXABLE: bool = false;

pub const ENDPOINT_FIELDS: &[FieldSpec] = &[
    FieldSpec::hybrid("cache_duration_seconds"),
    FieldSpec::user("description"),
    FieldSpec::hybrid("enable_auth"),
    FieldSpec::computed("id"),
    FieldSpec::hybrid("max_limit"),
    FieldSpec::user("name"),
    FieldSpec::hybrid("proactive_requerying_seconds"),
    FieldSpec::user("query"),
    FieldSpec::hybrid("sandboxable"),
    FieldSpec::hybrid("source_mapping"),
    FieldSpec::computed("token").sensitive(),
];

/// Persisted state of a query endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointRecord {
    pub cache_duration_seconds: Option<i32>,
    pub description: Option<String>,
    pub enable_auth: Option<bool>,
    pub id: Option<i64>,
    pub max_limit: Option<i32>,
    pub name: String,
    pub proactive_requerying_seconds: Option<i32>,
    pub query: String,
    pub sandboxable: Option<bool>,
    pub source_mapping: Option<JsonText>,
    pub token: Option<Sensitive<String>>,
}

impl EndpointRecord {
    pub fn new(name: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            query: query.into(),
            ..Default::default()
        }
    }

    /// Fill unset fields that have a schema default.
    pub fn with_defaults(mut self) -> Self {
        self.cache_duration_seconds
            .get_or_insert(DEFAULT_CACHE_DURATION_SECONDS);
        self.enable_auth.get_or_insert(DEFAULT_ENABLE_AUTH);
        self.max_limit.get_or_insert(DEFAULT_MAX_LIMIT);
        self.proactive_requerying_seconds
            .get_or_insert(DEFAULT_PROACTIVE_REQUERYING_SECONDS);
        self.sandboxable.get_or_insert(DEFAULT_SANDBOXABLE);
        self.source_mapping.get_or_insert_with(JsonText::empty_object);
        self
    }
}

/// `EndpointApiSchema` body of the Logflare management API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_duration_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enable_auth: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_limit: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proactive_requerying_seconds: Option<i64>,
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sandboxable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_mapping: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Sensitive<String>>,
}

impl ResourceModel for EndpointRecord {
    type Wire = EndpointWire;

    const KIND: ResourceKind = ResourceKind::Endpoint;
    const FIELDS: &'static [FieldSpec] = ENDPOINT_FIELDS;

    fn token(&self) -> Option<&str> {
        self.token.as_ref().map(Sensitive::as_str)
    }

    fn to_wire(&self) -> Result<EndpointWire, Diagnostics> {
        let mut diagnostics = Diagnostics::new();
        if self.name.is_empty() {
            diagnostics.push(MappingError::MissingRequired("name").into());
        }
        if self.query.is_empty() {
            diagnostics.push(MappingError::MissingRequired("query").into());
        }
        if diagnostics.has_error() {
            return Err(diagnostics);
        }

        Ok(EndpointWire {
            cache_duration_seconds: widen_i32(self.cache_duration_seconds),
            description: self.description.clone(),
            enable_auth: self.enable_auth,
            max_limit: widen_i32(self.max_limit),
            name: self.name.clone(),
            proactive_requerying_seconds: widen_i32(self.proactive_requerying_seconds),
            query: self.query.clone(),
            sandboxable: self.sandboxable,
            source_mapping: free_form_to_wire("source_mapping", self.source_mapping.as_ref())?,
            ..Default::default()
        })
    }

    fn from_wire(wire: EndpointWire, existing: &Self) -> Result<Self, Diagnostics> {
        Ok(Self {
            cache_duration_seconds: narrow_i32(
                "cache_duration_seconds",
                wire.cache_duration_seconds,
            )?,
            description: existing.description.clone(),
            enable_auth: wire.enable_auth,
            id: wire.id,
            max_limit: narrow_i32("max_limit", wire.max_limit)?,
            name: existing.name.clone(),
            proactive_requerying_seconds: narrow_i32(
                "proactive_requerying_seconds",
                wire.proactive_requerying_seconds,
            )?,
            query: existing.query.clone(),
            sandboxable: wire.sandboxable,
            source_mapping: Some(free_form_from_wire(wire.source_mapping)),
            token: wire.token,
        })
    }

    fn to_value(&self) -> ObjectValue {
        ObjectBuilder::new()
            .field(
                "cache_duration_seconds",
                int_value(widen_i32(self.cache_duration_seconds)),
            )
            .field("description", string_value(self.description.as_deref()))
            .field("enable_auth", bool_value(self.enable_auth))
            .field("id", int_value(self.id))
            .field("max_limit", int_value(widen_i32(self.max_limit)))
            .field("name", TypedValue::string(self.name.as_str()))
            .field(
                "proactive_requerying_seconds",
                int_value(widen_i32(self.proactive_requerying_seconds)),
            )
            .field("query", TypedValue::string(self.query.as_str()))
            .field("sandboxable", bool_value(self.sandboxable))
            .field("source_mapping", free_form_value(self.source_mapping.as_ref()))
            .field("token", sensitive_value(&self.token))
            .build()
    }

    fn inherit_computed(self, prior: &Self) -> Self {
        Self {
            id: self.id.or(prior.id),
            token: self.token.or_else(|| prior.token.clone()),
            ..self
        }
    }
}
