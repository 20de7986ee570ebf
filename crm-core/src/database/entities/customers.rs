use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::database::decode_list;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub emails: String, // JSON array stored as string
    pub primary_phone: Option<String>,
    #[sea_orm(column_type = "Text")]
    pub phones: String, // JSON array stored as string
    pub code: Option<String>,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub do_not_disturb: bool,
    #[sea_orm(column_type = "Text")]
    pub tag_ids: String, // JSON array stored as string
    #[sea_orm(column_type = "Text")]
    pub company_ids: String, // JSON array stored as string
    #[sea_orm(column_type = "Text")]
    pub custom_fields_data: String, // JSON object keyed by field id
    #[sea_orm(column_type = "Text")]
    pub merged_ids: String, // JSON array stored as string
    pub created_at: ChronoDateTimeUtc,
    pub modified_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn emails(&self) -> Vec<String> {
        decode_list(&self.emails)
    }

    pub fn phones(&self) -> Vec<String> {
        decode_list(&self.phones)
    }

    pub fn tag_ids(&self) -> Vec<String> {
        decode_list(&self.tag_ids)
    }

    pub fn company_ids(&self) -> Vec<String> {
        decode_list(&self.company_ids)
    }

    pub fn merged_ids(&self) -> Vec<String> {
        decode_list(&self.merged_ids)
    }

    /// Name used in audit log descriptions; falls back to email, then id.
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.trim().is_empty())
            .collect::<Vec<_>>()
            .join(" ");

        if !name.is_empty() {
            return name;
        }

        self.primary_email
            .clone()
            .unwrap_or_else(|| self.id.clone())
    }
}
