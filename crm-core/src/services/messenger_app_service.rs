use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::require_text;
use crate::database::entities::messenger_apps::{self, MessengerAppKind};
use crate::database::{decode_map, encode_map, new_id};
use crate::errors::{CoreError, CoreResult};

const ENTITY: &str = "Messenger app";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessengerAppInput {
    pub kind: MessengerAppKind,
    pub name: String,
    #[serde(default)]
    pub credentials: Map<String, Value>,
}

#[derive(Clone)]
pub struct MessengerAppService {
    db: DatabaseConnection,
}

impl MessengerAppService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_app(&self, id: &str) -> CoreResult<messenger_apps::Model> {
        messenger_apps::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    pub async fn list_apps(
        &self,
        kind: Option<MessengerAppKind>,
    ) -> CoreResult<Vec<messenger_apps::Model>> {
        let mut query = messenger_apps::Entity::find();
        if let Some(kind) = kind {
            query = query.filter(messenger_apps::Column::Kind.eq(kind.as_str()));
        }

        Ok(query
            .order_by_asc(messenger_apps::Column::CreatedAt)
            .all(&self.db)
            .await?)
    }

    pub async fn create_app(&self, input: MessengerAppInput) -> CoreResult<messenger_apps::Model> {
        require_text(&input.name, "name")?;

        let app = messenger_apps::ActiveModel {
            id: Set(new_id()),
            kind: Set(input.kind.as_str().to_string()),
            name: Set(input.name),
            credentials: Set(encode_map(&input.credentials)),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(app_id = %app.id, kind = %app.kind, "Messenger app created");
        Ok(app)
    }

    /// Renames the app and, when given, replaces its credentials.
    pub async fn update_app(
        &self,
        id: &str,
        name: Option<String>,
        credentials: Option<Map<String, Value>>,
    ) -> CoreResult<messenger_apps::Model> {
        let app = self.get_app(id).await?;

        let mut active: messenger_apps::ActiveModel = app.into();
        if let Some(name) = name {
            require_text(&name, "name")?;
            active.name = Set(name);
        }
        if let Some(credentials) = credentials {
            active.credentials = Set(encode_map(&credentials));
        }

        Ok(active.update(&self.db).await?)
    }

    pub async fn remove_app(&self, id: &str) -> CoreResult<messenger_apps::Model> {
        let app = self.get_app(id).await?;
        messenger_apps::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(app)
    }

    pub fn credentials(app: &messenger_apps::Model) -> Map<String, Value> {
        decode_map(&app.credentials)
    }
}
