use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "messenger_apps")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub kind: String, // 'googleMeet', 'knowledgebase', 'lead', 'website'
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub credentials: String, // JSON object
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Integration types a messenger app can wrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessengerAppKind {
    #[serde(rename = "googleMeet")]
    GoogleMeet,
    #[serde(rename = "knowledgebase")]
    Knowledgebase,
    #[serde(rename = "lead")]
    Lead,
    #[serde(rename = "website")]
    Website,
}

impl MessengerAppKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessengerAppKind::GoogleMeet => "googleMeet",
            MessengerAppKind::Knowledgebase => "knowledgebase",
            MessengerAppKind::Lead => "lead",
            MessengerAppKind::Website => "website",
        }
    }
}

impl fmt::Display for MessengerAppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessengerAppKind {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "googleMeet" => Ok(MessengerAppKind::GoogleMeet),
            "knowledgebase" => Ok(MessengerAppKind::Knowledgebase),
            "lead" => Ok(MessengerAppKind::Lead),
            "website" => Ok(MessengerAppKind::Website),
            other => Err(format!("Unknown messenger app kind: {}", other)),
        }
    }
}
