use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::customer_service::merge_custom_fields;
use super::deal_service::deal_names_using_products;
use super::product_category_service::{find_category_by_code, get_category};
use super::{non_blank, require_text};
use crate::database::entities::products::{self, ProductType};
use crate::database::{decode_map, encode_map, new_id};
use crate::errors::{CoreError, CoreResult};

const ENTITY: &str = "Product";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub code: String,
    #[serde(rename = "type", default)]
    pub product_type: ProductType,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Option<f64>,
    pub category_id: Option<String>,
    /// Resolved to a category id; wins over `category_id`.
    pub category_code: Option<String>,
    pub custom_fields_data: Option<Map<String, Value>>,
}

/// Edit payload. `custom_fields_data` is merged key by key into the stored
/// map; a `null` value clears that key.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub unit_price: Option<f64>,
    pub category_id: Option<String>,
    pub category_code: Option<String>,
    pub custom_fields_data: Option<Map<String, Value>>,
}

#[derive(Clone)]
pub struct ProductService {
    db: DatabaseConnection,
}

impl ProductService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_product(&self, id: &str) -> CoreResult<Option<products::Model>> {
        Ok(products::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get_product(&self, id: &str) -> CoreResult<products::Model> {
        products::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CoreError::not_found(ENTITY, id))
    }

    pub async fn list_products(&self, category_id: Option<&str>) -> CoreResult<Vec<products::Model>> {
        let mut query = products::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(products::Column::CategoryId.eq(category_id));
        }

        Ok(query
            .order_by_asc(products::Column::Name)
            .order_by_asc(products::Column::Code)
            .all(&self.db)
            .await?)
    }

    /// Number of products filed directly under `category_id`.
    pub async fn count_products(&self, category_id: &str) -> CoreResult<u64> {
        Ok(products::Entity::find()
            .filter(products::Column::CategoryId.eq(category_id))
            .count(&self.db)
            .await?)
    }

    pub async fn create_product(&self, input: ProductInput) -> CoreResult<products::Model> {
        require_text(&input.name, "name")?;
        require_text(&input.code, "code")?;
        ensure_unique_code(&self.db, &input.code, None).await?;

        let category_id = resolve_category(
            &self.db,
            input.category_id.as_deref(),
            input.category_code.as_deref(),
        )
        .await?;

        let product = products::ActiveModel {
            id: Set(new_id()),
            name: Set(input.name),
            code: Set(input.code),
            product_type: Set(input.product_type.as_str().to_string()),
            description: Set(input.description),
            sku: Set(input.sku),
            unit_price: Set(input.unit_price),
            category_id: Set(category_id),
            custom_fields_data: Set(encode_map(&input.custom_fields_data.unwrap_or_default())),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(product_id = %product.id, code = %product.code, "Product created");
        Ok(product)
    }

    pub async fn update_product(&self, id: &str, update: ProductUpdate) -> CoreResult<products::Model> {
        let current = self.get_product(id).await?;

        if let Some(name) = &update.name {
            require_text(name, "name")?;
        }
        if let Some(code) = &update.code {
            require_text(code, "code")?;
            ensure_unique_code(&self.db, code, Some(id)).await?;
        }

        let category_id = if update.category_id.is_some() || update.category_code.is_some() {
            Some(
                resolve_category(
                    &self.db,
                    update.category_id.as_deref(),
                    update.category_code.as_deref(),
                )
                .await?,
            )
        } else {
            None
        };

        let custom_fields = update
            .custom_fields_data
            .map(|values| merge_custom_fields(decode_map(&current.custom_fields_data), values));

        let mut active: products::ActiveModel = current.into();
        if let Some(name) = update.name {
            active.name = Set(name);
        }
        if let Some(code) = update.code {
            active.code = Set(code);
        }
        if let Some(product_type) = update.product_type {
            active.product_type = Set(product_type.as_str().to_string());
        }
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        if let Some(sku) = update.sku {
            active.sku = Set(Some(sku));
        }
        if let Some(unit_price) = update.unit_price {
            active.unit_price = Set(Some(unit_price));
        }
        if let Some(category_id) = category_id {
            active.category_id = Set(category_id);
        }
        if let Some(custom_fields) = custom_fields {
            active.custom_fields_data = Set(encode_map(&custom_fields));
        }

        Ok(active.update(&self.db).await?)
    }

    /// Deletes every product in `ids` unless a deal still lists one of them.
    pub async fn remove_products(&self, ids: &[String]) -> CoreResult<bool> {
        let txn = self.db.begin().await?;

        let deal_names = deal_names_using_products(&txn, ids).await?;
        if !deal_names.is_empty() {
            return Err(CoreError::validation(format!(
                "Can not remove products. Following deals are used {}",
                deal_names.join(",")
            )));
        }

        let result = products::Entity::delete_many()
            .filter(products::Column::Id.is_in(ids.iter().cloned()))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        tracing::info!(removed = result.rows_affected, "Products removed");
        Ok(true)
    }
}

async fn ensure_unique_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
    exclude_id: Option<&str>,
) -> CoreResult<()> {
    let mut query = products::Entity::find().filter(products::Column::Code.eq(code));
    if let Some(exclude_id) = exclude_id {
        query = query.filter(products::Column::Id.ne(exclude_id));
    }

    if query.one(db).await?.is_some() {
        return Err(CoreError::validation("Code must be unique").with_field("code", code));
    }
    Ok(())
}

/// Category reference of a product document: a code is looked up, an id must
/// exist. Blank values detach the product.
async fn resolve_category<C: ConnectionTrait>(
    db: &C,
    category_id: Option<&str>,
    category_code: Option<&str>,
) -> CoreResult<Option<String>> {
    if let Some(code) = non_blank(category_code) {
        return Ok(Some(find_category_by_code(db, code).await?.id));
    }
    if let Some(id) = non_blank(category_id) {
        return Ok(Some(get_category(db, id).await?.id));
    }
    Ok(None)
}
