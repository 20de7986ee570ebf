use super::AppContext;
use crate::auth::{actions, Actor};
use crate::database::entities::{deal_product_lines, deals};
use crate::errors::CoreResult;
use crate::services::{DealProductLineInput, LogEntry};

const LOG_TYPE: &str = "deal";

impl AppContext {
    pub async fn deal_detail(&self, actor: &Actor, id: &str) -> CoreResult<deals::Model> {
        self.authorize(actor, actions::SHOW_DEALS)?;
        self.deal_service.get_deal(id).await
    }

    pub async fn deal_product_lines(
        &self,
        actor: &Actor,
        deal_id: &str,
    ) -> CoreResult<Vec<deal_product_lines::Model>> {
        self.authorize(actor, actions::SHOW_DEALS)?;
        self.deal_service.product_lines(deal_id).await
    }

    pub async fn deals_add(
        &self,
        actor: &Actor,
        name: String,
        description: Option<String>,
        products_data: Vec<DealProductLineInput>,
    ) -> CoreResult<deals::Model> {
        self.authorize(actor, actions::DEALS_ADD)?;

        let deal = self
            .deal_service
            .create_deal(&name, description, products_data.clone())
            .await?;
        self.activity_log_service
            .put_create_log(
                LogEntry::new(LOG_TYPE, &deal.id, &deal, format!("{} has been created", deal.name))
                    .with_new_data(&products_data),
                actor,
            )
            .await;

        Ok(deal)
    }

    pub async fn deals_edit_products(
        &self,
        actor: &Actor,
        id: &str,
        products_data: Vec<DealProductLineInput>,
    ) -> CoreResult<deals::Model> {
        self.authorize(actor, actions::DEALS_EDIT)?;

        let prior_lines = self.deal_service.product_lines(id).await?;
        let deal = self
            .deal_service
            .update_products_data(id, products_data.clone())
            .await?;
        self.activity_log_service
            .put_update_log(
                LogEntry::new(
                    LOG_TYPE,
                    id,
                    &prior_lines,
                    format!("{} products have been updated", deal.name),
                )
                .with_new_data(&products_data),
                actor,
            )
            .await;

        Ok(deal)
    }

    pub async fn deals_remove(&self, actor: &Actor, id: &str) -> CoreResult<deals::Model> {
        self.authorize(actor, actions::DEALS_REMOVE)?;

        let deal = self.deal_service.remove_deal(id).await?;
        self.activity_log_service
            .put_delete_log(
                LogEntry::new(LOG_TYPE, id, &deal, format!("{} has been deleted", deal.name)),
                actor,
            )
            .await;

        Ok(deal)
    }
}
