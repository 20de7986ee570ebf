use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{ProductCategory, ProductCategoryAddInput, ProductCategoryEditInput};

#[derive(Default)]
pub struct ProductCategoryMutation;

#[Object]
impl ProductCategoryMutation {
    async fn product_categories_add(
        &self,
        ctx: &Context<'_>,
        input: ProductCategoryAddInput,
    ) -> Result<ProductCategory> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let category = context
            .app
            .product_categories_add(&actor, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(ProductCategory::from(category))
    }

    async fn product_categories_edit(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: ProductCategoryEditInput,
    ) -> Result<ProductCategory> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let category = context
            .app
            .product_categories_edit(&actor, &id, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(ProductCategory::from(category))
    }

    /// Remove an empty category; returns its id
    async fn product_categories_remove(&self, ctx: &Context<'_>, id: String) -> Result<String> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        context
            .app
            .product_categories_remove(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)
    }
}
