use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::messenger_apps;
use serde_json::{Map, Value};

use super::json_text;
use crate::graphql::errors::StructuredError;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
#[graphql(rename_items = "camelCase")]
pub enum MessengerAppKind {
    GoogleMeet,
    Knowledgebase,
    Lead,
    Website,
}

impl From<MessengerAppKind> for messenger_apps::MessengerAppKind {
    fn from(value: MessengerAppKind) -> Self {
        match value {
            MessengerAppKind::GoogleMeet => messenger_apps::MessengerAppKind::GoogleMeet,
            MessengerAppKind::Knowledgebase => messenger_apps::MessengerAppKind::Knowledgebase,
            MessengerAppKind::Lead => messenger_apps::MessengerAppKind::Lead,
            MessengerAppKind::Website => messenger_apps::MessengerAppKind::Website,
        }
    }
}

impl From<messenger_apps::MessengerAppKind> for MessengerAppKind {
    fn from(value: messenger_apps::MessengerAppKind) -> Self {
        match value {
            messenger_apps::MessengerAppKind::GoogleMeet => MessengerAppKind::GoogleMeet,
            messenger_apps::MessengerAppKind::Knowledgebase => MessengerAppKind::Knowledgebase,
            messenger_apps::MessengerAppKind::Lead => MessengerAppKind::Lead,
            messenger_apps::MessengerAppKind::Website => MessengerAppKind::Website,
        }
    }
}

#[derive(SimpleObject)]
pub struct MessengerApp {
    pub id: String,
    pub kind: MessengerAppKind,
    pub name: String,
    pub credentials: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<messenger_apps::Model> for MessengerApp {
    type Error = Error;

    fn try_from(model: messenger_apps::Model) -> Result<Self> {
        let kind = model
            .kind
            .parse::<messenger_apps::MessengerAppKind>()
            .map_err(StructuredError::internal)?;

        Ok(Self {
            kind: kind.into(),
            credentials: json_text(&model.credentials),
            id: model.id,
            name: model.name,
            created_at: model.created_at,
        })
    }
}

#[derive(InputObject)]
pub struct MessengerAppAddInput {
    pub kind: MessengerAppKind,
    pub name: String,
    pub credentials: Option<Json<Map<String, Value>>>,
}
