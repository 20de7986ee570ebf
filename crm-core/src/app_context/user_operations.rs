use super::AppContext;
use crate::auth::{actions, Actor};
use crate::database::entities::users;
use crate::errors::CoreResult;
use crate::services::{LogEntry, NewUser};

const LOG_TYPE: &str = "user";

impl AppContext {
    /// Resolves a request's user id into its principal.
    pub async fn actor_for_user(&self, user_id: &str) -> CoreResult<Actor> {
        self.user_service.actor_for_user(user_id).await
    }

    pub async fn current_user(&self, actor: &Actor) -> CoreResult<Option<users::Model>> {
        match actor.user_id.as_deref() {
            Some(id) => Ok(Some(self.user_service.get_user(id).await?)),
            None => Ok(None),
        }
    }

    pub async fn users_add(&self, actor: &Actor, input: NewUser) -> CoreResult<users::Model> {
        self.authorize(actor, actions::MANAGE_USERS)?;

        let user = self.user_service.create_user(input).await?;
        self.activity_log_service
            .put_create_log(
                LogEntry::new(
                    LOG_TYPE,
                    &user.id,
                    &user,
                    format!("{} has been created", user.username),
                ),
                actor,
            )
            .await;

        Ok(user)
    }

    pub async fn users_set_actions(
        &self,
        actor: &Actor,
        id: &str,
        granted: Vec<String>,
    ) -> CoreResult<users::Model> {
        self.authorize(actor, actions::MANAGE_USERS)?;

        let prior = self.user_service.get_user(id).await?;
        let user = self.user_service.set_actions(id, granted.clone()).await?;
        self.activity_log_service
            .put_update_log(
                LogEntry::new(
                    LOG_TYPE,
                    id,
                    &prior,
                    format!("{} permissions have been updated", prior.username),
                )
                .with_new_data(&granted),
                actor,
            )
            .await;

        Ok(user)
    }
}
