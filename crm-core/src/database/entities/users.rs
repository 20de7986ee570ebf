use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::database::decode_list;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub is_owner: bool,
    pub is_active: bool,
    #[sea_orm(column_type = "Text")]
    pub actions: String, // JSON array of granted permission actions
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn actions(&self) -> Vec<String> {
        decode_list(&self.actions)
    }
}
