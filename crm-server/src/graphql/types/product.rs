use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::products;
use crm::services::{ProductInput, ProductUpdate};
use serde_json::{Map, Value};

use super::json_text;
use super::ProductCategory;
use crate::graphql::context::GraphQLContext;
use crate::graphql::errors::core_error_to_graphql_error;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug, Default)]
#[graphql(rename_items = "lowercase")]
pub enum ProductType {
    #[default]
    Product,
    Service,
}

impl From<ProductType> for products::ProductType {
    fn from(value: ProductType) -> Self {
        match value {
            ProductType::Product => products::ProductType::Product,
            ProductType::Service => products::ProductType::Service,
        }
    }
}

impl From<products::ProductType> for ProductType {
    fn from(value: products::ProductType) -> Self {
        match value {
            products::ProductType::Product => ProductType::Product,
            products::ProductType::Service => ProductType::Service,
        }
    }
}

#[derive(SimpleObject)]
#[graphql(complex)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub code: String,
    #[graphql(name = "type")]
    pub product_type: ProductType,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Option<f64>,
    pub category_id: Option<String>,
    pub custom_fields_data: Json<Value>,
    pub created_at: DateTime<Utc>,
}

impl From<products::Model> for Product {
    fn from(model: products::Model) -> Self {
        Self {
            product_type: model.parsed_type().into(),
            custom_fields_data: json_text(&model.custom_fields_data),
            id: model.id,
            name: model.name,
            code: model.code,
            description: model.description,
            sku: model.sku,
            unit_price: model.unit_price,
            category_id: model.category_id,
            created_at: model.created_at,
        }
    }
}

#[ComplexObject]
impl Product {
    async fn category(&self, ctx: &Context<'_>) -> Result<Option<ProductCategory>> {
        let Some(category_id) = self.category_id.as_deref() else {
            return Ok(None);
        };

        let context = ctx.data::<GraphQLContext>()?;
        match context
            .app
            .product_category_service()
            .get_product_category(category_id)
            .await
        {
            Ok(category) => Ok(Some(ProductCategory::from(category))),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(core_error_to_graphql_error(err)),
        }
    }
}

#[derive(InputObject)]
pub struct ProductAddInput {
    pub name: String,
    pub code: String,
    #[graphql(name = "type")]
    pub product_type: Option<ProductType>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Option<f64>,
    pub category_id: Option<String>,
    pub category_code: Option<String>,
    pub custom_fields_data: Option<Json<Map<String, Value>>>,
}

impl From<ProductAddInput> for ProductInput {
    fn from(input: ProductAddInput) -> Self {
        Self {
            name: input.name,
            code: input.code,
            product_type: input.product_type.unwrap_or_default().into(),
            description: input.description,
            sku: input.sku,
            unit_price: input.unit_price,
            category_id: input.category_id,
            category_code: input.category_code,
            custom_fields_data: input.custom_fields_data.map(|data| data.0),
        }
    }
}

/// Fields to change. `customFieldsData` is merged into the stored values; a
/// null value clears that field.
#[derive(InputObject, Default)]
pub struct ProductEditInput {
    pub name: Option<String>,
    pub code: Option<String>,
    #[graphql(name = "type")]
    pub product_type: Option<ProductType>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Option<f64>,
    pub category_id: Option<String>,
    pub category_code: Option<String>,
    pub custom_fields_data: Option<Json<Map<String, Value>>>,
}

impl From<ProductEditInput> for ProductUpdate {
    fn from(input: ProductEditInput) -> Self {
        Self {
            name: input.name,
            code: input.code,
            product_type: input.product_type.map(Into::into),
            description: input.description,
            sku: input.sku,
            unit_price: input.unit_price,
            category_id: input.category_id,
            category_code: input.category_code,
            custom_fields_data: input.custom_fields_data.map(|data| data.0),
        }
    }
}
