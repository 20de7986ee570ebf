use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::{deal_product_lines, deals};
use crm::services::DealProductLineInput;

use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct Deal {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<deals::Model> for Deal {
    fn from(model: deals::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
            modified_at: model.modified_at,
        }
    }
}

#[ComplexObject]
impl Deal {
    async fn products_data(&self, ctx: &Context<'_>) -> Result<Vec<DealProductLine>> {
        let context = ctx.data::<GraphQLContext>()?;
        let lines = context
            .app
            .deal_service()
            .product_lines(&self.id)
            .await
            .map_err(core_error_to_graphql_error)?;

        Ok(lines.into_iter().map(DealProductLine::from).collect())
    }
}

#[derive(SimpleObject)]
pub struct DealProductLine {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: Option<f64>,
}

impl From<deal_product_lines::Model> for DealProductLine {
    fn from(model: deal_product_lines::Model) -> Self {
        Self {
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price: model.unit_price,
        }
    }
}

#[derive(InputObject)]
pub struct ProductLineInput {
    pub product_id: String,
    #[graphql(default = 1)]
    pub quantity: i32,
    pub unit_price: Option<f64>,
}

impl From<ProductLineInput> for DealProductLineInput {
    fn from(input: ProductLineInput) -> Self {
        Self {
            product_id: input.product_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
        }
    }
}

#[derive(InputObject)]
pub struct DealAddInput {
    pub name: String,
    pub description: Option<String>,
    #[graphql(default)]
    pub products_data: Vec<ProductLineInput>,
}
