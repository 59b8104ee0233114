//! Source resource: record, wire schema and mapper.

use crate::canonical::JsonText;
use crate::convert::{
    bool_value, free_form_from_wire, free_form_to_wire, free_form_value, int_value,
    narrow_i32, normalize_timestamp, string_value, widen_i32,
};
use crate::error::MappingError;
use crate::fields::{FieldSpec, ResourceKind};
use crate::model::ResourceModel;
use crate::notifications::NotificationSettings;
use crate::sensitive::Sensitive;
use serde::{Deserialize, Serialize};
use value_core::{Diagnostics, ObjectBuilder, ObjectValue, TypedValue};

pub const DEFAULT_API_QUOTA: i32 = 25;
pub const DEFAULT_FAVORITE: bool = false;

pub const SOURCE_FIELDS: &[FieldSpec] = &[
    FieldSpec::computed("id"),
    FieldSpec::user("name"),
    FieldSpec::hybrid("api_quota"),
    FieldSpec::hybrid("bigquery_table_ttl"),
    FieldSpec::hybrid("bq_table_id"),
    FieldSpec::hybrid("custom_event_message_keys"),
    FieldSpec::hybrid("default_ingest_backend_enabled"),
    FieldSpec::hybrid("favorite"),
    FieldSpec::computed("has_rejected_events"),
    FieldSpec::computed("inserted_at"),
    FieldSpec::hybrid("metrics"),
    FieldSpec::hybrid("notifications"),
    FieldSpec::computed("public_token").sensitive(),
    FieldSpec::hybrid("slack_hook_url").sensitive(),
    FieldSpec::computed("token").sensitive(),
    FieldSpec::computed("updated_at"),
    FieldSpec::hybrid("webhook_notification_url").sensitive(),
];

/// Persisted state of a log source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRecord {
    pub id: Option<i64>,
    pub name: String,
    pub api_quota: Option<i32>,
    pub bigquery_table_ttl: Option<i32>,
    pub bq_table_id: Option<String>,
    pub custom_event_message_keys: Option<String>,
    pub default_ingest_backend_enabled: Option<bool>,
    pub favorite: Option<bool>,
    pub has_rejected_events: Option<bool>,
    pub inserted_at: Option<String>,
    pub metrics: Option<JsonText>,
    pub notifications: Option<NotificationSettings>,
    pub public_token: Option<Sensitive<String>>,
    pub slack_hook_url: Option<Sensitive<String>>,
    pub token: Option<Sensitive<String>>,
    pub updated_at: Option<String>,
    pub webhook_notification_url: Option<Sensitive<String>>,
}

impl SourceRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Fill unset fields that have a schema default.
    pub fn with_defaults(mut self) -> Self {
        self.api_quota.get_or_insert(DEFAULT_API_QUOTA);
        self.favorite.get_or_insert(DEFAULT_FAVORITE);
        self
    }
}

/// `Source` body of the Logflare management API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceWire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_quota: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bigquery_table_ttl: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bq_table_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_event_message_keys: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_ingest_backend_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_rejected_events: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inserted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notifications: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_token: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_hook_url: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<Sensitive<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_notification_url: Option<Sensitive<String>>,
}

impl ResourceModel for SourceRecord {
    type Wire = SourceWire;

    const KIND: ResourceKind = ResourceKind::Source;
    const FIELDS: &'static [FieldSpec] = SOURCE_FIELDS;

    fn token(&self) -> Option<&str> {
        self.token.as_ref().map(Sensitive::as_str)
    }

    fn to_wire(&self) -> Result<SourceWire, Diagnostics> {
        if self.name.is_empty() {
            return Err(MappingError::MissingRequired("name").into());
        }

        Ok(SourceWire {
            name: self.name.clone(),
            api_quota: widen_i32(self.api_quota),
            bigquery_table_ttl: widen_i32(self.bigquery_table_ttl),
            bq_table_id: self.bq_table_id.clone(),
            custom_event_message_keys: self.custom_event_message_keys.clone(),
            default_ingest_backend_enabled: self.default_ingest_backend_enabled,
            favorite: self.favorite,
            metrics: free_form_to_wire("metrics", self.metrics.as_ref())?,
            notifications: self.notifications.as_ref().map(NotificationSettings::to_wire),
            slack_hook_url: self.slack_hook_url.clone(),
            webhook_notification_url: self.webhook_notification_url.clone(),
            ..Default::default()
        })
    }

    fn from_wire(wire: SourceWire, existing: &Self) -> Result<Self, Diagnostics> {
        let notifications = wire
            .notifications
            .as_ref()
            .map(NotificationSettings::from_wire)
            .transpose()?;

        Ok(Self {
            id: wire.id,
            name: existing.name.clone(),
            api_quota: narrow_i32("api_quota", wire.api_quota)?,
            bigquery_table_ttl: narrow_i32("bigquery_table_ttl", wire.bigquery_table_ttl)?,
            bq_table_id: wire.bq_table_id,
            custom_event_message_keys: wire.custom_event_message_keys,
            default_ingest_backend_enabled: wire.default_ingest_backend_enabled,
            favorite: wire.favorite,
            has_rejected_events: wire.has_rejected_events,
            inserted_at: normalize_timestamp("inserted_at", wire.inserted_at.as_deref())?,
            metrics: Some(free_form_from_wire(wire.metrics)),
            notifications,
            public_token: wire.public_token,
            slack_hook_url: wire.slack_hook_url,
            token: wire.token,
            updated_at: normalize_timestamp("updated_at", wire.updated_at.as_deref())?,
            webhook_notification_url: wire.webhook_notification_url,
        })
    }

    fn to_value(&self) -> ObjectValue {
        let notifications = match &self.notifications {
            Some(settings) => settings.to_value().into(),
            None => TypedValue::null(NotificationSettings::value_type()),
        };

        ObjectBuilder::new()
            .field("id", int_value(self.id))
            .field("name", TypedValue::string(self.name.as_str()))
            .field("api_quota", int_value(widen_i32(self.api_quota)))
            .field("bigquery_table_ttl", int_value(widen_i32(self.bigquery_table_ttl)))
            .field("bq_table_id", string_value(self.bq_table_id.as_deref()))
            .field(
                "custom_event_message_keys",
                string_value(self.custom_event_message_keys.as_deref()),
            )
            .field(
                "default_ingest_backend_enabled",
                bool_value(self.default_ingest_backend_enabled),
            )
            .field("favorite", bool_value(self.favorite))
            .field("has_rejected_events", bool_value(self.has_rejected_events))
            .field("inserted_at", string_value(self.inserted_at.as_deref()))
            .field("metrics", free_form_value(self.metrics.as_ref()))
            .field("notifications", notifications)
            .field("public_token", sensitive_value(&self.public_token))
            .field("slack_hook_url", sensitive_value(&self.slack_hook_url))
            .field("token", sensitive_value(&self.token))
            .field("updated_at", string_value(self.updated_at.as_deref()))
            .field(
                "webhook_notification_url",
                sensitive_value(&self.webhook_notification_url),
            )
            .build()
    }

    fn inherit_computed(self, prior: &Self) -> Self {
        Self {
            id: self.id.or(prior.id),
            has_rejected_events: self.has_rejected_events.or(prior.has_rejected_events),
            inserted_at: self.inserted_at.or_else(|| prior.inserted_at.clone()),
            public_token: self.public_token.or_else(|| prior.public_token.clone()),
            token: self.token.or_else(|| prior.token.clone()),
            updated_at: self.updated_at.or_else(|| prior.updated_at.clone()),
            ..self
        }
    }
}

pub(crate) fn sensitive_value(value: &Option<Sensitive<String>>) -> TypedValue {
    string_value(value.as_ref().map(Sensitive::as_str))
}
