use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{
    ActivityLog, Customer, Deal, MessengerApp, MessengerAppKind, Product, ProductCategory, User,
};

const DEFAULT_CUSTOMER_LIMIT: u64 = 50;

pub struct Query;

#[Object]
impl Query {
    /// Customers, newest first, optionally filtered by name, email or phone
    async fn customers(
        &self,
        ctx: &Context<'_>,
        search: Option<String>,
        limit: Option<u64>,
    ) -> Result<Vec<Customer>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let customers = context
            .app
            .list_customers(
                &actor,
                search.as_deref(),
                limit.unwrap_or(DEFAULT_CUSTOMER_LIMIT),
            )
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(customers.into_iter().map(Customer::from).collect())
    }

    async fn customer_detail(&self, ctx: &Context<'_>, id: String) -> Result<Customer> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let customer = context
            .app
            .customer_detail(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Customer::from(customer))
    }

    async fn products(
        &self,
        ctx: &Context<'_>,
        category_id: Option<String>,
    ) -> Result<Vec<Product>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let products = context
            .app
            .list_products(&actor, category_id.as_deref())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(products.into_iter().map(Product::from).collect())
    }

    async fn product_detail(&self, ctx: &Context<'_>, id: String) -> Result<Product> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let product = context
            .app
            .product_detail(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Product::from(product))
    }

    /// Categories in tree order; only direct children when `parentId` is given
    async fn product_categories(
        &self,
        ctx: &Context<'_>,
        parent_id: Option<String>,
    ) -> Result<Vec<ProductCategory>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let categories = context
            .app
            .list_product_categories(&actor, parent_id.as_deref())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(categories.into_iter().map(ProductCategory::from).collect())
    }

    async fn deal_detail(&self, ctx: &Context<'_>, id: String) -> Result<Deal> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let deal = context
            .app
            .deal_detail(&actor, &id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Deal::from(deal))
    }

    async fn messenger_apps(
        &self,
        ctx: &Context<'_>,
        kind: Option<MessengerAppKind>,
    ) -> Result<Vec<MessengerApp>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let apps = context
            .app
            .list_messenger_apps(&actor, kind.map(Into::into))
            .await
            .map_err(core_error_to_graphql_error)?;

        apps.into_iter().map(MessengerApp::try_from).collect()
    }

    /// The user making the request, if any
    async fn current_user(&self, ctx: &Context<'_>) -> Result<Option<User>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let user = context
            .app
            .current_user(&actor)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(user.map(User::from))
    }

    async fn activity_logs(&self, ctx: &Context<'_>, object_id: String) -> Result<Vec<ActivityLog>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let logs = context
            .app
            .activity_logs(&actor, &object_id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(logs.into_iter().map(ActivityLog::from).collect())
    }
}
