use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Serialize;
use serde_json::Value;

use crate::auth::Actor;
use crate::database::entities::activity_logs;
use crate::database::new_id;
use crate::errors::CoreResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogAction {
    Create,
    Update,
    Delete,
}

impl LogAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogAction::Create => "create",
            LogAction::Update => "update",
            LogAction::Delete => "delete",
        }
    }
}

/// What a mutation wants recorded about the object it touched.
#[derive(Clone, Debug)]
pub struct LogEntry {
    pub log_type: String,
    pub object_id: String,
    pub object: Value,
    pub new_data: Option<Value>,
    pub description: String,
}

impl LogEntry {
    pub fn new<T: Serialize>(
        log_type: impl Into<String>,
        object_id: impl Into<String>,
        object: &T,
        description: impl Into<String>,
    ) -> Self {
        Self {
            log_type: log_type.into(),
            object_id: object_id.into(),
            object: serde_json::to_value(object).unwrap_or(Value::Null),
            new_data: None,
            description: description.into(),
        }
    }

    pub fn with_new_data<T: Serialize>(mut self, new_data: &T) -> Self {
        self.new_data = serde_json::to_value(new_data).ok();
        self
    }
}

/// Audit log writer.
///
/// The `put_*` helpers never fail: the primary write has already happened by
/// the time they run, so a logging failure is reported through tracing only.
#[derive(Clone)]
pub struct ActivityLogService {
    db: DatabaseConnection,
}

impl ActivityLogService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn put_create_log(&self, entry: LogEntry, actor: &Actor) {
        self.put_log(LogAction::Create, entry, actor).await
    }

    pub async fn put_update_log(&self, entry: LogEntry, actor: &Actor) {
        self.put_log(LogAction::Update, entry, actor).await
    }

    pub async fn put_delete_log(&self, entry: LogEntry, actor: &Actor) {
        self.put_log(LogAction::Delete, entry, actor).await
    }

    async fn put_log(&self, action: LogAction, entry: LogEntry, actor: &Actor) {
        let log_type = entry.log_type.clone();
        let object_id = entry.object_id.clone();

        if let Err(e) = self.insert_log(action, entry, actor).await {
            tracing::warn!(
                log_type = %log_type,
                object_id = %object_id,
                action = action.as_str(),
                error = ?e,
                "Failed to write activity log"
            );
        }
    }

    pub async fn insert_log(
        &self,
        action: LogAction,
        entry: LogEntry,
        actor: &Actor,
    ) -> CoreResult<activity_logs::Model> {
        let log = activity_logs::ActiveModel {
            id: Set(new_id()),
            log_type: Set(entry.log_type),
            action: Set(action.as_str().to_string()),
            object_id: Set(entry.object_id),
            object: Set(serde_json::to_string(&entry.object)?),
            new_data: Set(entry.new_data.map(|data| data.to_string())),
            description: Set(entry.description),
            created_by: Set(actor.user_id.clone()),
            created_at: Set(Utc::now()),
        };

        Ok(log.insert(&self.db).await?)
    }

    pub async fn logs_for_object(&self, object_id: &str) -> CoreResult<Vec<activity_logs::Model>> {
        Ok(activity_logs::Entity::find()
            .filter(activity_logs::Column::ObjectId.eq(object_id))
            .order_by_asc(activity_logs::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use serde_json::json;

    #[tokio::test]
    async fn test_logs_are_recorded_per_object() {
        let db = setup_test_db().await;
        let service = ActivityLogService::new(db);
        let actor = Actor::user("u1");

        service
            .put_create_log(
                LogEntry::new("customer", "c1", &json!({"firstName": "Ann"}), "Ann has been created")
                    .with_new_data(&json!({"firstName": "Ann"})),
                &actor,
            )
            .await;
        service
            .put_delete_log(
                LogEntry::new("customer", "c1", &json!({}), "Ann has been deleted"),
                &actor,
            )
            .await;
        service
            .put_create_log(LogEntry::new("customer", "c2", &json!({}), "other"), &actor)
            .await;

        let logs = service.logs_for_object("c1").await.unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].action, "create");
        assert_eq!(logs[0].created_by.as_deref(), Some("u1"));
        assert_eq!(logs[0].new_data.as_deref(), Some(r#"{"firstName":"Ann"}"#));
        assert_eq!(logs[1].action, "delete");
        assert!(logs[1].new_data.is_none());
    }
}
