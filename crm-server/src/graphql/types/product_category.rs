use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::product_categories;
use crm::services::{ProductCategoryInput, ProductCategoryUpdate};

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct ProductCategory {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    pub order: String,
    pub created_at: DateTime<Utc>,
}

impl From<product_categories::Model> for ProductCategory {
    fn from(model: product_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
            parent_id: model.parent_id,
            order: model.order,
            created_at: model.created_at,
        }
    }
}

#[ComplexObject]
impl ProductCategory {
    /// Number of products filed directly under this category.
    async fn product_count(&self, ctx: &Context<'_>) -> Result<u64> {
        let context = ctx.data::<GraphQLContext>()?;
        context
            .app
            .product_service()
            .count_products(&self.id)
            .await
            .map_err(core_error_to_graphql_error)
    }
}

#[derive(InputObject)]
pub struct ProductCategoryAddInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

impl From<ProductCategoryAddInput> for ProductCategoryInput {
    fn from(input: ProductCategoryAddInput) -> Self {
        Self {
            name: input.name,
            code: input.code,
            description: input.description,
            parent_id: input.parent_id,
        }
    }
}

#[derive(InputObject, Default)]
pub struct ProductCategoryEditInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    /// Must match the current parent; categories cannot be moved.
    pub parent_id: Option<String>,
}

impl From<ProductCategoryEditInput> for ProductCategoryUpdate {
    fn from(input: ProductCategoryEditInput) -> Self {
        Self {
            name: input.name,
            code: input.code,
            description: input.description,
            parent_id: input.parent_id,
        }
    }
}
