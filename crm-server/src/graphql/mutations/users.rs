use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{User, UserAddInput};

#[derive(Default)]
pub struct UserMutation;

#[Object]
impl UserMutation {
    async fn users_add(&self, ctx: &Context<'_>, input: UserAddInput) -> Result<User> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let user = context
            .app
            .users_add(&actor, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(User::from(user))
    }

    /// Replace the permission actions granted to a user
    async fn users_set_actions(
        &self,
        ctx: &Context<'_>,
        id: String,
        actions: Vec<String>,
    ) -> Result<User> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let user = context
            .app
            .users_set_actions(&actor, &id, actions)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(User::from(user))
    }
}
