use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::activity_logs;
use serde_json::Value;

use super::json_text;

#[derive(SimpleObject)]
pub struct ActivityLog {
    pub id: String,
    pub log_type: String,
    pub action: String,
    pub object_id: String,
    pub object: Json<Value>,
    pub new_data: Option<Json<Value>>,
    pub description: String,
    pub created_by: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<activity_logs::Model> for ActivityLog {
    fn from(model: activity_logs::Model) -> Self {
        Self {
            object: json_text(&model.object),
            new_data: model.new_data.as_deref().map(json_text),
            id: model.id,
            log_type: model.log_type,
            action: model.action,
            object_id: model.object_id,
            description: model.description,
            created_by: model.created_by,
            created_at: model.created_at,
        }
    }
}
