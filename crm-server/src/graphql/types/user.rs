use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::users;
use crm::services::NewUser;

#[derive(SimpleObject)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_owner: bool,
    pub is_active: bool,
    pub actions: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            actions: model.actions(),
            id: model.id,
            username: model.username,
            email: model.email,
            is_owner: model.is_owner,
            is_active: model.is_active,
            created_at: model.created_at,
        }
    }
}

#[derive(InputObject)]
pub struct UserAddInput {
    pub username: String,
    pub email: String,
    #[graphql(default)]
    pub is_owner: bool,
    #[graphql(default)]
    pub actions: Vec<String>,
}

impl From<UserAddInput> for NewUser {
    fn from(input: UserAddInput) -> Self {
        Self {
            username: input.username,
            email: input.email,
            is_owner: input.is_owner,
            actions: input.actions,
        }
    }
}
