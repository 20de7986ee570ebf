use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Product, ProductAddInput, ProductEditInput};

#[derive(Default)]
pub struct ProductMutation;

#[Object]
impl ProductMutation {
    async fn products_add(&self, ctx: &Context<'_>, input: ProductAddInput) -> Result<Product> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let product = context
            .app
            .products_add(&actor, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Product::from(product))
    }

    async fn products_edit(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: ProductEditInput,
    ) -> Result<Product> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let product = context
            .app
            .products_edit(&actor, &id, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Product::from(product))
    }

    /// Remove products that no deal refers to
    async fn products_remove(&self, ctx: &Context<'_>, product_ids: Vec<String>) -> Result<bool> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        context
            .app
            .products_remove(&actor, product_ids)
            .await
            .map_err(core_error_to_graphql_error)
    }
}
