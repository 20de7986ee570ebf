use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Audit trail entry written after create, update and delete mutations.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub log_type: String, // 'customer', 'product', ...
    pub action: String,   // 'create', 'update', 'delete'
    pub object_id: String,
    #[sea_orm(column_type = "Text")]
    pub object: String, // JSON snapshot of the record before the change
    #[sea_orm(column_type = "Text", nullable)]
    pub new_data: Option<String>,
    pub description: String,
    pub created_by: Option<String>,
    pub created_at: ChronoDateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
