use super::AppContext;
use crate::auth::{actions, Actor};
use crate::database::entities::{product_categories, products};
use crate::errors::CoreResult;
use crate::services::{
    LogEntry, ProductCategoryInput, ProductCategoryUpdate, ProductInput, ProductUpdate,
};

const PRODUCT_LOG_TYPE: &str = "product";
const CATEGORY_LOG_TYPE: &str = "productCategory";

impl AppContext {
    // ----- Product queries ------------------------------------------------
    pub async fn list_products(
        &self,
        actor: &Actor,
        category_id: Option<&str>,
    ) -> CoreResult<Vec<products::Model>> {
        self.authorize(actor, actions::SHOW_PRODUCTS)?;
        self.product_service.list_products(category_id).await
    }

    pub async fn product_detail(&self, actor: &Actor, id: &str) -> CoreResult<products::Model> {
        self.authorize(actor, actions::SHOW_PRODUCTS)?;
        self.product_service.get_product(id).await
    }

    pub async fn list_product_categories(
        &self,
        actor: &Actor,
        parent_id: Option<&str>,
    ) -> CoreResult<Vec<product_categories::Model>> {
        self.authorize(actor, actions::SHOW_PRODUCTS)?;
        self.product_category_service
            .list_product_categories(parent_id)
            .await
    }

    // ----- Product mutations ----------------------------------------------
    pub async fn products_add(
        &self,
        actor: &Actor,
        input: ProductInput,
    ) -> CoreResult<products::Model> {
        self.authorize(actor, actions::MANAGE_PRODUCTS)?;

        let product = self.product_service.create_product(input.clone()).await?;
        self.activity_log_service
            .put_create_log(
                LogEntry::new(
                    PRODUCT_LOG_TYPE,
                    &product.id,
                    &product,
                    format!("{} has been created", product.name),
                )
                .with_new_data(&input),
                actor,
            )
            .await;

        Ok(product)
    }

    pub async fn products_edit(
        &self,
        actor: &Actor,
        id: &str,
        update: ProductUpdate,
    ) -> CoreResult<products::Model> {
        self.authorize(actor, actions::MANAGE_PRODUCTS)?;

        let prior = self.product_service.get_product(id).await?;
        let product = self.product_service.update_product(id, update.clone()).await?;
        self.activity_log_service
            .put_update_log(
                LogEntry::new(
                    PRODUCT_LOG_TYPE,
                    id,
                    &prior,
                    format!("{} has been updated", prior.name),
                )
                .with_new_data(&update),
                actor,
            )
            .await;

        Ok(product)
    }

    pub async fn products_remove(&self, actor: &Actor, ids: Vec<String>) -> CoreResult<bool> {
        self.authorize(actor, actions::MANAGE_PRODUCTS)?;

        let mut removed = Vec::with_capacity(ids.len());
        for id in &ids {
            if let Some(product) = self.product_service.find_product(id).await? {
                removed.push(product);
            }
        }

        let result = self.product_service.remove_products(&ids).await?;

        for product in removed {
            self.activity_log_service
                .put_delete_log(
                    LogEntry::new(
                        PRODUCT_LOG_TYPE,
                        &product.id,
                        &product,
                        format!("{} has been deleted", product.name),
                    ),
                    actor,
                )
                .await;
        }

        Ok(result)
    }

    // ----- Product category mutations -------------------------------------
    pub async fn product_categories_add(
        &self,
        actor: &Actor,
        input: ProductCategoryInput,
    ) -> CoreResult<product_categories::Model> {
        self.authorize(actor, actions::MANAGE_PRODUCTS)?;

        let category = self
            .product_category_service
            .create_product_category(input.clone())
            .await?;
        self.activity_log_service
            .put_create_log(
                LogEntry::new(
                    CATEGORY_LOG_TYPE,
                    &category.id,
                    &category,
                    format!("{} has been created", category.name),
                )
                .with_new_data(&input),
                actor,
            )
            .await;

        Ok(category)
    }

    pub async fn product_categories_edit(
        &self,
        actor: &Actor,
        id: &str,
        update: ProductCategoryUpdate,
    ) -> CoreResult<product_categories::Model> {
        self.authorize(actor, actions::MANAGE_PRODUCTS)?;

        let prior = self.product_category_service.get_product_category(id).await?;
        let category = self
            .product_category_service
            .update_product_category(id, update.clone())
            .await?;
        self.activity_log_service
            .put_update_log(
                LogEntry::new(
                    CATEGORY_LOG_TYPE,
                    id,
                    &prior,
                    format!("{} has been updated", prior.name),
                )
                .with_new_data(&update),
                actor,
            )
            .await;

        Ok(category)
    }

    pub async fn product_categories_remove(&self, actor: &Actor, id: &str) -> CoreResult<String> {
        self.authorize(actor, actions::MANAGE_PRODUCTS)?;

        let prior = self.product_category_service.get_product_category(id).await?;
        self.product_category_service
            .remove_product_category(id)
            .await?;
        self.activity_log_service
            .put_delete_log(
                LogEntry::new(
                    CATEGORY_LOG_TYPE,
                    id,
                    &prior,
                    format!("{} has been deleted", prior.name),
                ),
                actor,
            )
            .await;

        Ok(id.to_string())
    }
}
