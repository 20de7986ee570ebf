use std::sync::Arc;

use crm::auth::Actor;
use crm::AppContext;

use crate::graphql::errors::core_error_to_graphql_error;

#[derive(Clone)]
pub struct GraphQLContext {
    pub app: Arc<AppContext>,
}

/// User id the HTTP layer read from the `x-user-id` header.
#[derive(Clone, Debug)]
pub struct RequestUser(pub String);

impl RequestUser {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl GraphQLContext {
    pub fn new(app: Arc<AppContext>) -> Self {
        Self { app }
    }

    /// Principal of the current request; anonymous without a known user.
    pub async fn actor_for_request(
        &self,
        ctx: &async_graphql::Context<'_>,
    ) -> async_graphql::Result<Actor> {
        let Some(user) = ctx.data_opt::<RequestUser>() else {
            return Ok(Actor::anonymous());
        };

        self.app
            .actor_for_user(user.as_str())
            .await
            .map_err(core_error_to_graphql_error)
    }
}
