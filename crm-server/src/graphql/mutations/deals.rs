use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Deal, DealAddInput, ProductLineInput};

#[derive(Default)]
pub struct DealMutation;

#[Object]
impl DealMutation {
    async fn deals_add(&self, ctx: &Context<'_>, input: DealAddInput) -> Result<Deal> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let deal = context
            .app
            .deals_add(
                &actor,
                input.name,
                input.description,
                input.products_data.into_iter().map(Into::into).collect(),
            )
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Deal::from(deal))
    }

    /// Replace the product lines of a deal
    async fn deals_edit_products(
        &self,
        ctx: &Context<'_>,
        id: String,
        products_data: Vec<ProductLineInput>,
    ) -> Result<Deal> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let deal = context
            .app
            .deals_edit_products(
                &actor,
                &id,
                products_data.into_iter().map(Into::into).collect(),
            )
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Deal::from(deal))
    }

    async fn deals_remove(&self, ctx: &Context<'_>, id: String) -> Result<Deal> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let deal = context
            .app
            .deals_remove(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Deal::from(deal))
    }
}
