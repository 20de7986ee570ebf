use serde_json::{Map, Value};

use super::AppContext;
use crate::auth::{actions, Actor};
use crate::database::entities::messenger_apps::{self, MessengerAppKind};
use crate::errors::CoreResult;
use crate::services::{LogEntry, MessengerAppInput};

const LOG_TYPE: &str = "messengerApp";

impl AppContext {
    pub async fn list_messenger_apps(
        &self,
        actor: &Actor,
        kind: Option<MessengerAppKind>,
    ) -> CoreResult<Vec<messenger_apps::Model>> {
        self.authorize(actor, actions::SHOW_MESSENGER_APPS)?;
        self.messenger_app_service.list_apps(kind).await
    }

    pub async fn messenger_apps_add(
        &self,
        actor: &Actor,
        input: MessengerAppInput,
    ) -> CoreResult<messenger_apps::Model> {
        self.authorize(actor, actions::MANAGE_MESSENGER_APPS)?;

        let app = self.messenger_app_service.create_app(input).await?;
        self.activity_log_service
            .put_create_log(
                LogEntry::new(LOG_TYPE, &app.id, &app, format!("{} has been created", app.name)),
                actor,
            )
            .await;

        Ok(app)
    }

    pub async fn messenger_apps_edit(
        &self,
        actor: &Actor,
        id: &str,
        name: Option<String>,
        credentials: Option<Map<String, Value>>,
    ) -> CoreResult<messenger_apps::Model> {
        self.authorize(actor, actions::MANAGE_MESSENGER_APPS)?;

        let prior = self.messenger_app_service.get_app(id).await?;
        let app = self
            .messenger_app_service
            .update_app(id, name, credentials)
            .await?;
        self.activity_log_service
            .put_update_log(
                LogEntry::new(LOG_TYPE, id, &prior, format!("{} has been updated", prior.name))
                    .with_new_data(&app),
                actor,
            )
            .await;

        Ok(app)
    }

    pub async fn messenger_apps_remove(
        &self,
        actor: &Actor,
        id: &str,
    ) -> CoreResult<messenger_apps::Model> {
        self.authorize(actor, actions::MANAGE_MESSENGER_APPS)?;

        let app = self.messenger_app_service.remove_app(id).await?;
        self.activity_log_service
            .put_delete_log(
                LogEntry::new(LOG_TYPE, id, &app, format!("{} has been deleted", app.name)),
                actor,
            )
            .await;

        Ok(app)
    }
}
