use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::{non_blank, require_text};
use crate::database::entities::{product_categories, products};
use crate::database::new_id;
use crate::errors::{CoreError, CoreResult};

const ENTITY: &str = "Product & service category";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

/// Edit payload. `parent_id` may only repeat the current parent.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCategoryUpdate {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<String>,
}

#[derive(Clone)]
pub struct ProductCategoryService {
    db: DatabaseConnection,
}

impl ProductCategoryService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_product_category(&self, id: &str) -> CoreResult<product_categories::Model> {
        get_category(&self.db, id).await
    }

    pub async fn find_by_code(&self, code: &str) -> CoreResult<Option<product_categories::Model>> {
        Ok(product_categories::Entity::find()
            .filter(product_categories::Column::Code.eq(code))
            .one(&self.db)
            .await?)
    }

    /// Categories directly under `parent_id`, or every category when `None`,
    /// in tree order.
    pub async fn list_product_categories(
        &self,
        parent_id: Option<&str>,
    ) -> CoreResult<Vec<product_categories::Model>> {
        let mut query = product_categories::Entity::find();
        if let Some(parent_id) = parent_id {
            query = query.filter(product_categories::Column::ParentId.eq(parent_id));
        }

        Ok(query
            .order_by_asc(product_categories::Column::Order)
            .all(&self.db)
            .await?)
    }

    pub async fn create_product_category(
        &self,
        input: ProductCategoryInput,
    ) -> CoreResult<product_categories::Model> {
        require_text(&input.name, "name")?;
        require_text(&input.code, "code")?;
        ensure_unique_code(&self.db, &input.code, None).await?;

        let parent_id = non_blank(input.parent_id.as_deref()).map(str::to_string);
        let parent_order = match &parent_id {
            Some(parent_id) => Some(get_category(&self.db, parent_id).await?.order),
            None => None,
        };

        let category = product_categories::ActiveModel {
            id: Set(new_id()),
            order: Set(category_order(
                parent_order.as_deref(),
                &input.name,
                &input.code,
            )),
            name: Set(input.name),
            code: Set(input.code),
            description: Set(input.description),
            parent_id: Set(parent_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        tracing::info!(category_id = %category.id, order = %category.order, "Product category created");
        Ok(category)
    }

    pub async fn update_product_category(
        &self,
        id: &str,
        update: ProductCategoryUpdate,
    ) -> CoreResult<product_categories::Model> {
        let txn = self.db.begin().await?;
        let current = get_category(&txn, id).await?;

        // A blank parent means the root, as on create.
        if update.parent_id.is_some() {
            let requested = non_blank(update.parent_id.as_deref());
            if requested != current.parent_id.as_deref() {
                return Err(CoreError::validation("Cannot change category")
                    .with_field("parent_id", requested.unwrap_or_default()));
            }
        }

        if let Some(code) = &update.code {
            require_text(code, "code")?;
            ensure_unique_code(&txn, code, Some(id)).await?;
        }
        if let Some(name) = &update.name {
            require_text(name, "name")?;
        }

        let name = update.name.unwrap_or_else(|| current.name.clone());
        let code = update.code.unwrap_or_else(|| current.code.clone());

        let parent_order = match &current.parent_id {
            Some(parent_id) => Some(get_category(&txn, parent_id).await?.order),
            None => None,
        };
        let old_order = current.order.clone();
        let new_order = category_order(parent_order.as_deref(), &name, &code);

        let mut active: product_categories::ActiveModel = current.into();
        active.name = Set(name);
        active.code = Set(code);
        if let Some(description) = update.description {
            active.description = Set(Some(description));
        }
        active.order = Set(new_order.clone());
        let updated = active.update(&txn).await?;

        if new_order != old_order {
            rewrite_descendant_orders(&txn, id, &old_order, &new_order).await?;
        }

        txn.commit().await?;
        Ok(updated)
    }

    pub async fn remove_product_category(&self, id: &str) -> CoreResult<()> {
        let txn = self.db.begin().await?;
        get_category(&txn, id).await?;

        let product_count = products::Entity::find()
            .filter(products::Column::CategoryId.eq(id))
            .count(&txn)
            .await?;
        let child_count = product_categories::Entity::find()
            .filter(product_categories::Column::ParentId.eq(id))
            .count(&txn)
            .await?;

        if product_count > 0 || child_count > 0 {
            return Err(CoreError::validation("Can't remove a product category")
                .with_field("products", product_count.to_string())
                .with_field("children", child_count.to_string()));
        }

        product_categories::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(category_id = %id, "Product category removed");
        Ok(())
    }
}

pub(crate) async fn get_category<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> CoreResult<product_categories::Model> {
    product_categories::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))
}

pub(crate) async fn find_category_by_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
) -> CoreResult<product_categories::Model> {
    product_categories::Entity::find()
        .filter(product_categories::Column::Code.eq(code))
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, code).with_field("code", code))
}

async fn ensure_unique_code<C: ConnectionTrait>(
    db: &C,
    code: &str,
    exclude_id: Option<&str>,
) -> CoreResult<()> {
    let mut query =
        product_categories::Entity::find().filter(product_categories::Column::Code.eq(code));
    if let Some(exclude_id) = exclude_id {
        query = query.filter(product_categories::Column::Id.ne(exclude_id));
    }

    if query.one(db).await?.is_some() {
        return Err(CoreError::validation("Code must be unique").with_field("code", code));
    }
    Ok(())
}

fn category_order(parent_order: Option<&str>, name: &str, code: &str) -> String {
    match parent_order {
        Some(parent) => format!("{}/{}{}", parent, name, code),
        None => format!("{}{}", name, code),
    }
}

/// Replaces the `old_order` prefix on every other category that shares it or
/// sits beneath it.
async fn rewrite_descendant_orders<C: ConnectionTrait>(
    db: &C,
    id: &str,
    old_order: &str,
    new_order: &str,
) -> CoreResult<()> {
    let nested_prefix = format!("{}/", old_order);
    let affected = product_categories::Entity::find()
        .filter(product_categories::Column::Id.ne(id))
        .filter(product_categories::Column::Order.starts_with(old_order))
        .all(db)
        .await?;

    for category in affected {
        let rewritten = if category.order == old_order {
            new_order.to_string()
        } else if let Some(rest) = category.order.strip_prefix(&nested_prefix) {
            format!("{}/{}", new_order, rest)
        } else {
            continue;
        };

        let mut active: product_categories::ActiveModel = category.into();
        active.order = Set(rewritten);
        active.update(db).await?;
    }

    Ok(())
}
