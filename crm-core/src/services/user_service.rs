use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::auth::Actor;
use crate::database::entities::users;
use crate::database::{encode_list, extend_unique, new_id};
use crate::errors::{CoreError, CoreResult};

const ENTITY: &str = "User";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub is_owner: bool,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[derive(Clone)]
pub struct UserService {
    db: DatabaseConnection,
}

impl UserService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_user(&self, id: &str) -> CoreResult<users::Model> {
        users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    pub async fn create_user(&self, input: NewUser) -> CoreResult<users::Model> {
        require_text(&input.username, "username")?;
        require_text(&input.email, "email")?;

        let existing = users::Entity::find()
            .filter(
                Condition::any()
                    .add(users::Column::Username.eq(input.username.as_str()))
                    .add(users::Column::Email.eq(input.email.as_str())),
            )
            .one(&self.db)
            .await?;
        if let Some(existing) = existing {
            let field = if existing.username == input.username {
                "username"
            } else {
                "email"
            };
            return Err(CoreError::conflict(format!("User {} already exists", field))
                .with_field("field", field));
        }

        let mut actions = Vec::with_capacity(input.actions.len());
        extend_unique(&mut actions, input.actions);

        let user = users::ActiveModel {
            id: Set(new_id()),
            username: Set(input.username),
            email: Set(input.email),
            is_owner: Set(input.is_owner),
            is_active: Set(true),
            actions: Set(encode_list(&actions)),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    /// Replaces the user's granted actions.
    pub async fn set_actions(&self, id: &str, actions: Vec<String>) -> CoreResult<users::Model> {
        let user = self.get_user(id).await?;

        let mut unique = Vec::with_capacity(actions.len());
        extend_unique(&mut unique, actions);

        let mut active: users::ActiveModel = user.into();
        active.actions = Set(encode_list(&unique));
        Ok(active.update(&self.db).await?)
    }

    pub async fn set_active(&self, id: &str, is_active: bool) -> CoreResult<users::Model> {
        let user = self.get_user(id).await?;
        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(is_active);
        Ok(active.update(&self.db).await?)
    }

    /// Request principal for `id`. Unknown and deactivated users are
    /// anonymous.
    pub async fn actor_for_user(&self, id: &str) -> CoreResult<Actor> {
        let Some(user) = users::Entity::find_by_id(id).one(&self.db).await? else {
            tracing::debug!(user_id = %id, "Unknown user, treating request as anonymous");
            return Ok(Actor::anonymous());
        };

        if !user.is_active {
            return Ok(Actor::anonymous());
        }

        let actor = if user.is_owner {
            Actor::owner(user.id.clone())
        } else {
            Actor::user(user.id.clone())
        };
        Ok(actor.with_actions(user.actions()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use crate::errors::CoreErrorKind;

    #[tokio::test]
    async fn test_actor_for_user_carries_actions() {
        let service = UserService::new(setup_test_db().await);
        let user = service
            .create_user(NewUser {
                username: "sales".into(),
                email: "sales@example.com".into(),
                actions: vec!["showProducts".into(), "showProducts".into()],
                ..Default::default()
            })
            .await
            .unwrap();

        let actor = service.actor_for_user(&user.id).await.unwrap();
        assert!(actor.is_authenticated());
        assert!(actor.can("showProducts"));
        assert!(!actor.can("manageProducts"));
        assert!(!actor.is_owner());

        service.set_active(&user.id, false).await.unwrap();
        let actor = service.actor_for_user(&user.id).await.unwrap();
        assert!(!actor.is_authenticated());
    }

    #[tokio::test]
    async fn test_unknown_user_is_anonymous() {
        let service = UserService::new(setup_test_db().await);
        let actor = service.actor_for_user("nobody").await.unwrap();
        assert!(!actor.is_authenticated());

        let err = service.get_user("nobody").await.unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::NotFound);
        assert_eq!(err.message(), "User not found");
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let service = UserService::new(setup_test_db().await);
        let new_user = NewUser {
            username: "admin".into(),
            email: "admin@example.com".into(),
            is_owner: true,
            ..Default::default()
        };
        service.create_user(new_user.clone()).await.unwrap();

        let err = service.create_user(new_user).await.unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::Conflict);
    }
}
