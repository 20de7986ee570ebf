use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};

use super::require_text;
use crate::database::entities::{deal_product_lines, deals, products};
use crate::database::new_id;
use crate::errors::{CoreError, CoreResult};

const ENTITY: &str = "Deal";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealProductLineInput {
    pub product_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: i32,
    pub unit_price: Option<f64>,
}

fn default_quantity() -> i32 {
    1
}

#[derive(Clone)]
pub struct DealService {
    db: DatabaseConnection,
}

impl DealService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn get_deal(&self, id: &str) -> CoreResult<deals::Model> {
        get_deal(&self.db, id).await
    }

    pub async fn create_deal(
        &self,
        name: &str,
        description: Option<String>,
        products_data: Vec<DealProductLineInput>,
    ) -> CoreResult<deals::Model> {
        require_text(name, "name")?;

        let txn = self.db.begin().await?;
        let now = Utc::now();
        let deal = deals::ActiveModel {
            id: Set(new_id()),
            name: Set(name.to_string()),
            description: Set(description),
            created_at: Set(now),
            modified_at: Set(now),
        }
        .insert(&txn)
        .await?;

        insert_lines(&txn, &deal.id, products_data).await?;
        txn.commit().await?;

        tracing::info!(deal_id = %deal.id, "Deal created");
        Ok(deal)
    }

    /// Replaces the deal's product lines.
    pub async fn update_products_data(
        &self,
        id: &str,
        lines: Vec<DealProductLineInput>,
    ) -> CoreResult<deals::Model> {
        let txn = self.db.begin().await?;
        let deal = get_deal(&txn, id).await?;

        deal_product_lines::Entity::delete_many()
            .filter(deal_product_lines::Column::DealId.eq(id))
            .exec(&txn)
            .await?;
        insert_lines(&txn, id, lines).await?;

        let mut active: deals::ActiveModel = deal.into();
        active.modified_at = Set(Utc::now());
        let deal = active.update(&txn).await?;

        txn.commit().await?;
        Ok(deal)
    }

    pub async fn remove_deal(&self, id: &str) -> CoreResult<deals::Model> {
        let txn = self.db.begin().await?;
        let deal = get_deal(&txn, id).await?;

        deal_product_lines::Entity::delete_many()
            .filter(deal_product_lines::Column::DealId.eq(id))
            .exec(&txn)
            .await?;
        deals::Entity::delete_by_id(id).exec(&txn).await?;

        txn.commit().await?;
        Ok(deal)
    }

    pub async fn product_lines(&self, deal_id: &str) -> CoreResult<Vec<deal_product_lines::Model>> {
        Ok(deal_product_lines::Entity::find()
            .filter(deal_product_lines::Column::DealId.eq(deal_id))
            .order_by_asc(deal_product_lines::Column::Position)
            .all(&self.db)
            .await?)
    }
}

async fn get_deal<C: ConnectionTrait>(db: &C, id: &str) -> CoreResult<deals::Model> {
    deals::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))
}

async fn insert_lines<C: ConnectionTrait>(
    db: &C,
    deal_id: &str,
    lines: Vec<DealProductLineInput>,
) -> CoreResult<()> {
    for (position, line) in lines.into_iter().enumerate() {
        if line.quantity < 1 {
            return Err(CoreError::validation("Quantity must be positive")
                .with_field("product_id", line.product_id));
        }
        if products::Entity::find_by_id(line.product_id.as_str())
            .one(db)
            .await?
            .is_none()
        {
            return Err(CoreError::not_found("Product", line.product_id));
        }

        deal_product_lines::ActiveModel {
            id: Set(new_id()),
            deal_id: Set(deal_id.to_string()),
            product_id: Set(line.product_id),
            quantity: Set(line.quantity),
            unit_price: Set(line.unit_price),
            position: Set(position as i32),
        }
        .insert(db)
        .await?;
    }
    Ok(())
}

/// Names of the deals with a line item for any of `product_ids`, oldest deal
/// first, each deal once.
pub(crate) async fn deal_names_using_products<C: ConnectionTrait>(
    db: &C,
    product_ids: &[String],
) -> CoreResult<Vec<String>> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }

    let deal_ids: HashSet<String> = deal_product_lines::Entity::find()
        .filter(deal_product_lines::Column::ProductId.is_in(product_ids.iter().cloned()))
        .all(db)
        .await?
        .into_iter()
        .map(|line| line.deal_id)
        .collect();

    if deal_ids.is_empty() {
        return Ok(Vec::new());
    }

    let deals = deals::Entity::find()
        .filter(deals::Column::Id.is_in(deal_ids))
        .order_by_asc(deals::Column::CreatedAt)
        .order_by_asc(deals::Column::Id)
        .all(db)
        .await?;

    Ok(deals.into_iter().map(|deal| deal.name).collect())
}
