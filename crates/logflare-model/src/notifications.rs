//! Source notification settings, a nested object with a fixed schema.

use crate::convert::{bool_value, string_value};
use crate::error::MappingError;
use json_values::{decode_as, encode_object, DecodeContext};
use serde::{Deserialize, Serialize};
use value_core::{ListValue, ObjectBuilder, ObjectValue, TypedValue, ValueType};

const FIELD: &str = "notifications";

/// Notification preferences attached to a source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub other_email_notifications: Option<String>,
    pub team_user_ids_for_email: Option<Vec<String>>,
    pub team_user_ids_for_schema_updates: Option<Vec<String>>,
    pub team_user_ids_for_sms: Option<Vec<String>>,
    pub user_email_notifications: Option<bool>,
    pub user_schema_update_notifications: Option<bool>,
    pub user_text_notifications: Option<bool>,
}

impl NotificationSettings {
    /// Object type used to decode the nested wire mapping.
    pub fn value_type() -> ValueType {
        let ids = ValueType::list(ValueType::String);
        ValueType::object([
            ("other_email_notifications", ValueType::String),
            ("team_user_ids_for_email", ids.clone()),
            ("team_user_ids_for_schema_updates", ids.clone()),
            ("team_user_ids_for_sms", ids),
            ("user_email_notifications", ValueType::Bool),
            ("user_schema_update_notifications", ValueType::Bool),
            ("user_text_notifications", ValueType::Bool),
        ])
    }

    pub fn to_value(&self) -> ObjectValue {
        ObjectBuilder::new()
            .field(
                "other_email_notifications",
                string_value(self.other_email_notifications.as_deref()),
            )
            .field("team_user_ids_for_email", id_list(&self.team_user_ids_for_email))
            .field(
                "team_user_ids_for_schema_updates",
                id_list(&self.team_user_ids_for_schema_updates),
            )
            .field("team_user_ids_for_sms", id_list(&self.team_user_ids_for_sms))
            .field("user_email_notifications", bool_value(self.user_email_notifications))
            .field(
                "user_schema_update_notifications",
                bool_value(self.user_schema_update_notifications),
            )
            .field("user_text_notifications", bool_value(self.user_text_notifications))
            .build()
    }

    /// Nested mapping for request bodies; unset members are omitted.
    pub fn to_wire(&self) -> serde_json::Map<String, serde_json::Value> {
        encode_object(&self.to_value())
    }

    /// Decode the nested mapping from a response.
    ///
    /// Absent id lists become empty lists.
    pub fn from_wire(map: &serde_json::Map<String, serde_json::Value>) -> Result<Self, MappingError> {
        let raw = serde_json::Value::Object(map.clone());
        let typed = decode_as(&raw, &Self::value_type(), &mut DecodeContext::at(FIELD))
            .map_err(|source| MappingError::Conversion {
                field: FIELD,
                source,
            })?;

        Ok(Self {
            other_email_notifications: typed
                .get("other_email_notifications")
                .and_then(TypedValue::as_str)
                .map(str::to_string),
            team_user_ids_for_email: Some(ids_from(typed.get("team_user_ids_for_email"))),
            team_user_ids_for_schema_updates: Some(ids_from(
                typed.get("team_user_ids_for_schema_updates"),
            )),
            team_user_ids_for_sms: Some(ids_from(typed.get("team_user_ids_for_sms"))),
            user_email_notifications: typed
                .get("user_email_notifications")
                .and_then(TypedValue::as_bool),
            user_schema_update_notifications: typed
                .get("user_schema_update_notifications")
                .and_then(TypedValue::as_bool),
            user_text_notifications: typed
                .get("user_text_notifications")
                .and_then(TypedValue::as_bool),
        })
    }
}

fn id_list(ids: &Option<Vec<String>>) -> TypedValue {
    match ids {
        Some(ids) => ListValue::with_declared_type(
            ValueType::String,
            ids.iter().map(TypedValue::string).collect(),
        )
        .into(),
        None => TypedValue::null(ValueType::list(ValueType::String)),
    }
}

// Null elements have nothing to contribute and are dropped.
fn ids_from(value: Option<&TypedValue>) -> Vec<String> {
    value
        .and_then(TypedValue::as_list)
        .map(|list| {
            list.elements()
                .iter()
                .filter_map(TypedValue::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
