use async_graphql::*;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;
use crate::graphql::types::{Customer, CustomerFieldsInput};

#[derive(Default)]
pub struct CustomerMutation;

#[Object]
impl CustomerMutation {
    /// Create a new customer
    async fn customers_add(&self, ctx: &Context<'_>, input: CustomerFieldsInput) -> Result<Customer> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let customer = context
            .app
            .customers_add(&actor, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Customer::from(customer))
    }

    /// Update the given fields of a customer
    async fn customers_edit(
        &self,
        ctx: &Context<'_>,
        id: String,
        input: CustomerFieldsInput,
    ) -> Result<Customer> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let customer = context
            .app
            .customers_edit(&actor, &id, input.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Customer::from(customer))
    }

    /// Replace the companies a customer belongs to
    async fn customers_edit_companies(
        &self,
        ctx: &Context<'_>,
        id: String,
        company_ids: Vec<String>,
    ) -> Result<Customer> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let customer = context
            .app
            .customers_edit_companies(&actor, &id, company_ids)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Customer::from(customer))
    }

    /// Merge customers into a new one built from `customerFields`
    async fn customers_merge(
        &self,
        ctx: &Context<'_>,
        customer_ids: Vec<String>,
        customer_fields: CustomerFieldsInput,
    ) -> Result<Customer> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        let customer = context
            .app
            .customers_merge(&actor, customer_ids, customer_fields.into())
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(Customer::from(customer))
    }

    /// Remove customers; unknown ids are skipped
    async fn customers_remove(
        &self,
        ctx: &Context<'_>,
        customer_ids: Vec<String>,
    ) -> Result<Vec<String>> {
        let context = ctx.data::<GraphQLContext>()?;
        let actor = context.actor_for_request(ctx).await?;
        context
            .app
            .customers_remove(&actor, customer_ids)
            .await
            .map_err(core_error_to_graphql_error)
    }
}
