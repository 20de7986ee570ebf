use super::AppContext;
use crate::auth::{actions, Actor};
use crate::database::entities::customers;
use crate::errors::CoreResult;
use crate::services::{CustomerInput, LogEntry};

const LOG_TYPE: &str = "customer";

impl AppContext {
    // ----- Customer queries -----------------------------------------------
    pub async fn list_customers(
        &self,
        actor: &Actor,
        search: Option<&str>,
        limit: u64,
    ) -> CoreResult<Vec<customers::Model>> {
        self.authorize(actor, actions::SHOW_CUSTOMERS)?;
        self.customer_service.list_customers(search, limit).await
    }

    pub async fn customer_detail(&self, actor: &Actor, id: &str) -> CoreResult<customers::Model> {
        self.authorize(actor, actions::SHOW_CUSTOMERS)?;
        self.customer_service.get_customer(id).await
    }

    // ----- Customer mutations ---------------------------------------------
    pub async fn customers_add(
        &self,
        actor: &Actor,
        input: CustomerInput,
    ) -> CoreResult<customers::Model> {
        self.authorize(actor, actions::CUSTOMERS_ADD)?;

        let customer = self
            .customer_service
            .create_customer(input.clone(), actor)
            .await?;

        self.activity_log_service
            .put_create_log(
                LogEntry::new(
                    LOG_TYPE,
                    &customer.id,
                    &customer,
                    format!("{} has been created", customer.display_name()),
                )
                .with_new_data(&input),
                actor,
            )
            .await;

        Ok(customer)
    }

    pub async fn customers_edit(
        &self,
        actor: &Actor,
        id: &str,
        input: CustomerInput,
    ) -> CoreResult<customers::Model> {
        self.authorize(actor, actions::CUSTOMERS_EDIT)?;

        let prior = self.customer_service.find_customer(id).await?;
        let customer = self
            .customer_service
            .update_customer(id, input.clone())
            .await?;

        if let Some(prior) = prior {
            self.activity_log_service
                .put_update_log(
                    LogEntry::new(
                        LOG_TYPE,
                        &customer.id,
                        &prior,
                        format!("{} has been updated", prior.display_name()),
                    )
                    .with_new_data(&input),
                    actor,
                )
                .await;
        }

        Ok(customer)
    }

    pub async fn customers_edit_companies(
        &self,
        actor: &Actor,
        id: &str,
        company_ids: Vec<String>,
    ) -> CoreResult<customers::Model> {
        self.authorize(actor, actions::CUSTOMERS_EDIT_COMPANIES)?;
        self.customer_service.update_companies(id, company_ids).await
    }

    /// Merges and then tells the engagement service about the remap. The merge
    /// is already committed when that call fails.
    pub async fn customers_merge(
        &self,
        actor: &Actor,
        customer_ids: Vec<String>,
        fields: CustomerInput,
    ) -> CoreResult<customers::Model> {
        self.authorize(actor, actions::CUSTOMERS_MERGE)?;

        let outcome = self
            .customer_service
            .merge_customers(&customer_ids, fields.clone())
            .await?;

        self.activity_log_service
            .put_create_log(
                LogEntry::new(
                    LOG_TYPE,
                    &outcome.customer.id,
                    &outcome.customer,
                    format!(
                        "{} has been merged from {}",
                        outcome.customer.display_name(),
                        outcome.engage_change.customer_ids.join(",")
                    ),
                )
                .with_new_data(&fields),
                actor,
            )
            .await;

        self.engages.change_customer(&outcome.engage_change).await?;

        Ok(outcome.customer)
    }

    /// Removes each listed customer, skipping ids that do not exist, and
    /// echoes the input ids.
    pub async fn customers_remove(
        &self,
        actor: &Actor,
        customer_ids: Vec<String>,
    ) -> CoreResult<Vec<String>> {
        self.authorize(actor, actions::CUSTOMERS_REMOVE)?;

        for id in &customer_ids {
            let Some(customer) = self.customer_service.find_customer(id).await? else {
                tracing::debug!(customer_id = %id, "Skipping unknown customer");
                continue;
            };

            if self.customer_service.remove_customer(id).await? {
                self.activity_log_service
                    .put_delete_log(
                        LogEntry::new(
                            LOG_TYPE,
                            id,
                            &customer,
                            format!("{} has been deleted", customer.display_name()),
                        ),
                        actor,
                    )
                    .await;
            }
        }

        Ok(customer_ids)
    }
}
