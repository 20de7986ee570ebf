use async_graphql::*;
use crm::services::MessengerAppInput;
use serde_json::{Map, Value};

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{MessengerApp, MessengerAppAddInput};

#[derive(Default)]
pub struct MessengerAppMutation;

#[Object]
impl MessengerAppMutation {
    async fn messenger_apps_add(
        &self,
        ctx: &Context<'_>,
        input: MessengerAppAddInput,
    ) -> Result<MessengerApp> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let app = context
            .app
            .messenger_apps_add(
                &actor,
                MessengerAppInput {
                    kind: input.kind.into(),
                    name: input.name,
                    credentials: input.credentials.map(|c| c.0).unwrap_or_default(),
                },
            )
            .await
            .map_err(core_error_to_graphql_error)?;

        MessengerApp::try_from(app)
    }

    /// Rename an app and optionally replace its credentials
    async fn messenger_apps_edit(
        &self,
        ctx: &Context<'_>,
        id: String,
        name: Option<String>,
        credentials: Option<Json<Map<String, Value>>>,
    ) -> Result<MessengerApp> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let app = context
            .app
            .messenger_apps_edit(&actor, &id, name, credentials.map(|c| c.0))
            .await
            .map_err(core_error_to_graphql_error)?;

        MessengerApp::try_from(app)
    }

    /// Remove an app; returns its id
    async fn messenger_apps_remove(&self, ctx: &Context<'_>, id: String) -> Result<String> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let app = context
            .app
            .messenger_apps_remove(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(app.id)
    }
}
