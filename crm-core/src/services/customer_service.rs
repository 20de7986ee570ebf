use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::non_blank;
use crate::auth::Actor;
use crate::database::entities::customers;
use crate::database::{decode_map, encode_list, encode_map, extend_unique, new_id};
use crate::engages::EngageCustomerChange;
use crate::errors::{CoreError, CoreResult};

const ENTITY: &str = "Customer";

/// Customer document fields accepted by create, edit and merge.
/// Absent fields are left untouched on edit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emails: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phones: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub do_not_disturb: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields_data: Option<Map<String, Value>>,
}

/// Result of merging customers: the surviving record and the remap the
/// engagement service has to be told about.
#[derive(Clone, Debug)]
pub struct MergeOutcome {
    pub customer: customers::Model,
    pub engage_change: EngageCustomerChange,
}

#[derive(Clone)]
pub struct CustomerService {
    db: DatabaseConnection,
}

impl CustomerService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_customer(&self, id: &str) -> CoreResult<Option<customers::Model>> {
        Ok(customers::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn get_customer(&self, id: &str) -> CoreResult<customers::Model> {
        get_customer(&self.db, id).await
    }

    pub async fn list_customers(
        &self,
        search: Option<&str>,
        limit: u64,
    ) -> CoreResult<Vec<customers::Model>> {
        let mut query = customers::Entity::find();

        if let Some(term) = non_blank(search) {
            let term = term.trim();
            query = query.filter(
                Condition::any()
                    .add(customers::Column::FirstName.contains(term))
                    .add(customers::Column::LastName.contains(term))
                    .add(customers::Column::PrimaryEmail.contains(term))
                    .add(customers::Column::PrimaryPhone.contains(term)),
            );
        }

        Ok(query
            .order_by_desc(customers::Column::CreatedAt)
            .limit(limit)
            .all(&self.db)
            .await?)
    }

    pub async fn create_customer(
        &self,
        input: CustomerInput,
        actor: &Actor,
    ) -> CoreResult<customers::Model> {
        check_duplication(&self.db, &input, &[]).await?;

        let owner_id = input.owner_id.clone().or_else(|| actor.user_id.clone());
        let customer = new_customer(input, owner_id, Vec::new(), Vec::new())
            .insert(&self.db)
            .await?;

        tracing::info!(customer_id = %customer.id, "Customer created");
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        id: &str,
        input: CustomerInput,
    ) -> CoreResult<customers::Model> {
        let customer = self.get_customer(id).await?;
        check_duplication(&self.db, &input, &[customer.id.clone()]).await?;

        let mut active: customers::ActiveModel = customer.clone().into();
        apply_input(&mut active, &customer, input);
        active.modified_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Replaces the company association list wholesale.
    pub async fn update_companies(
        &self,
        id: &str,
        company_ids: Vec<String>,
    ) -> CoreResult<customers::Model> {
        let customer = self.get_customer(id).await?;

        let mut unique = Vec::with_capacity(company_ids.len());
        extend_unique(&mut unique, company_ids);

        let mut active: customers::ActiveModel = customer.into();
        active.company_ids = Set(encode_list(&unique));
        active.modified_at = Set(Utc::now());

        Ok(active.update(&self.db).await?)
    }

    /// Collapses `customer_ids` into one new customer built from `fields`.
    ///
    /// Relation lists (tags, companies, emails, phones) and custom field data
    /// of the sources are carried over; the sources are deleted. The check that
    /// `fields` does not collide with a customer outside the merge set runs in
    /// the same transaction as the writes.
    pub async fn merge_customers(
        &self,
        customer_ids: &[String],
        fields: CustomerInput,
    ) -> CoreResult<MergeOutcome> {
        let mut ids = Vec::with_capacity(customer_ids.len());
        extend_unique(&mut ids, customer_ids.iter().cloned());

        if ids.is_empty() {
            return Err(CoreError::validation("Customer ids are required to merge"));
        }

        let txn = self.db.begin().await?;

        let mut sources = Vec::with_capacity(ids.len());
        for id in &ids {
            sources.push(get_customer(&txn, id).await?);
        }

        check_duplication(&txn, &fields, &ids).await?;

        let mut tag_ids = Vec::new();
        let mut company_ids = Vec::new();
        let mut emails = Vec::new();
        let mut phones = Vec::new();
        let mut merged_ids = ids.clone();
        let mut custom_fields = Map::new();

        for source in &sources {
            extend_unique(&mut tag_ids, source.tag_ids());
            extend_unique(&mut company_ids, source.company_ids());
            extend_unique(&mut emails, source.emails());
            extend_unique(&mut phones, source.phones());
            extend_unique(&mut merged_ids, source.merged_ids());
            custom_fields.extend(decode_map(&source.custom_fields_data));
        }

        let mut fields = fields;
        if let Some(given) = fields.tag_ids.take() {
            extend_unique(&mut tag_ids, given);
        }
        if let Some(given) = fields.emails.take() {
            extend_unique(&mut emails, given);
        }
        if let Some(given) = fields.phones.take() {
            extend_unique(&mut phones, given);
        }
        if let Some(given) = fields.custom_fields_data.take() {
            custom_fields.extend(given);
        }

        fields.tag_ids = Some(tag_ids);
        fields.emails = Some(emails);
        fields.phones = Some(phones);
        fields.custom_fields_data = Some(custom_fields);

        let owner_id = fields
            .owner_id
            .clone()
            .or_else(|| sources.iter().find_map(|source| source.owner_id.clone()));

        let customer = new_customer(fields, owner_id, company_ids, merged_ids)
            .insert(&txn)
            .await?;

        customers::Entity::delete_many()
            .filter(customers::Column::Id.is_in(ids.clone()))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        tracing::info!(
            customer_id = %customer.id,
            merged = ids.len(),
            "Customers merged"
        );

        Ok(MergeOutcome {
            engage_change: EngageCustomerChange {
                new_customer_id: customer.id.clone(),
                customer_ids: ids,
            },
            customer,
        })
    }

    /// Deletes one customer. Returns false when nothing matched.
    pub async fn remove_customer(&self, id: &str) -> CoreResult<bool> {
        let result = customers::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }
}

pub(crate) async fn get_customer<C: ConnectionTrait>(
    db: &C,
    id: &str,
) -> CoreResult<customers::Model> {
    customers::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| CoreError::not_found(ENTITY, id))
}

/// Primary email, primary phone and code are unique across customers
/// other than `exclude_ids`.
async fn check_duplication<C: ConnectionTrait>(
    db: &C,
    input: &CustomerInput,
    exclude_ids: &[String],
) -> CoreResult<()> {
    let checks = [
        (
            customers::Column::PrimaryEmail,
            input.primary_email.as_deref(),
            "Duplicated email",
        ),
        (
            customers::Column::PrimaryPhone,
            input.primary_phone.as_deref(),
            "Duplicated phone",
        ),
        (customers::Column::Code, input.code.as_deref(), "Duplicated code"),
    ];

    for (column, value, message) in checks {
        let Some(value) = non_blank(value) else {
            continue;
        };

        let mut query = customers::Entity::find().filter(column.eq(value));
        if !exclude_ids.is_empty() {
            query = query.filter(customers::Column::Id.is_not_in(exclude_ids.iter().cloned()));
        }

        if query.one(db).await?.is_some() {
            return Err(CoreError::validation(message));
        }
    }

    Ok(())
}

fn new_customer(
    input: CustomerInput,
    owner_id: Option<String>,
    company_ids: Vec<String>,
    merged_ids: Vec<String>,
) -> customers::ActiveModel {
    let now = Utc::now();

    let mut emails = input.emails.unwrap_or_default();
    if let Some(primary) = non_blank(input.primary_email.as_deref()) {
        extend_unique(&mut emails, [primary.to_string()]);
    }
    let mut phones = input.phones.unwrap_or_default();
    if let Some(primary) = non_blank(input.primary_phone.as_deref()) {
        extend_unique(&mut phones, [primary.to_string()]);
    }

    customers::ActiveModel {
        id: Set(new_id()),
        first_name: Set(input.first_name),
        last_name: Set(input.last_name),
        primary_email: Set(input.primary_email),
        emails: Set(encode_list(&emails)),
        primary_phone: Set(input.primary_phone),
        phones: Set(encode_list(&phones)),
        code: Set(input.code),
        owner_id: Set(owner_id),
        description: Set(input.description),
        do_not_disturb: Set(input.do_not_disturb.unwrap_or(false)),
        tag_ids: Set(encode_list(&input.tag_ids.unwrap_or_default())),
        company_ids: Set(encode_list(&company_ids)),
        custom_fields_data: Set(encode_map(&input.custom_fields_data.unwrap_or_default())),
        merged_ids: Set(encode_list(&merged_ids)),
        created_at: Set(now),
        modified_at: Set(now),
    }
}

fn apply_input(
    active: &mut customers::ActiveModel,
    current: &customers::Model,
    input: CustomerInput,
) {
    if let Some(value) = input.first_name {
        active.first_name = Set(Some(value));
    }
    if let Some(value) = input.last_name {
        active.last_name = Set(Some(value));
    }
    if let Some(value) = input.code {
        active.code = Set(Some(value));
    }
    if let Some(value) = input.owner_id {
        active.owner_id = Set(Some(value));
    }
    if let Some(value) = input.description {
        active.description = Set(Some(value));
    }
    if let Some(value) = input.do_not_disturb {
        active.do_not_disturb = Set(value);
    }
    if let Some(value) = input.tag_ids {
        active.tag_ids = Set(encode_list(&value));
    }

    if input.emails.is_some() || input.primary_email.is_some() {
        let mut emails = input.emails.unwrap_or_else(|| current.emails());
        if let Some(primary) = non_blank(input.primary_email.as_deref()) {
            extend_unique(&mut emails, [primary.to_string()]);
        }
        if let Some(primary) = input.primary_email {
            active.primary_email = Set(Some(primary));
        }
        active.emails = Set(encode_list(&emails));
    }

    if input.phones.is_some() || input.primary_phone.is_some() {
        let mut phones = input.phones.unwrap_or_else(|| current.phones());
        if let Some(primary) = non_blank(input.primary_phone.as_deref()) {
            extend_unique(&mut phones, [primary.to_string()]);
        }
        if let Some(primary) = input.primary_phone {
            active.primary_phone = Set(Some(primary));
        }
        active.phones = Set(encode_list(&phones));
    }

    if let Some(values) = input.custom_fields_data {
        active.custom_fields_data = Set(encode_map(&merge_custom_fields(
            decode_map(&current.custom_fields_data),
            values,
        )));
    }
}

/// Sparse merge: given keys are set, a `null` value clears its key, all
/// other keys are kept.
pub(crate) fn merge_custom_fields(
    mut current: Map<String, Value>,
    updates: Map<String, Value>,
) -> Map<String, Value> {
    for (key, value) in updates {
        if value.is_null() {
            current.remove(&key);
        } else {
            current.insert(key, value);
        }
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_utils::setup_test_db;
    use crate::errors::CoreErrorKind;
    use serde_json::json;

    fn named(first: &str, email: &str) -> CustomerInput {
        CustomerInput {
            first_name: Some(first.to_string()),
            primary_email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_merge_custom_fields_is_sparse() {
        let current = json!({"a": 1, "b": 2}).as_object().cloned().unwrap();
        let updates = json!({"b": 3, "a": null, "c": "x"}).as_object().cloned().unwrap();
        let merged = merge_custom_fields(current, updates);
        assert_eq!(Value::Object(merged), json!({"b": 3, "c": "x"}));
    }

    #[tokio::test]
    async fn test_get_customer_not_found() {
        let service = CustomerService::new(setup_test_db().await);
        let err = service.get_customer("fakeId").await.unwrap_err();
        assert_eq!(err.kind(), CoreErrorKind::NotFound);
        assert_eq!(err.message(), "Customer not found");
    }

    #[tokio::test]
    async fn test_create_sets_owner_and_primary_email() {
        let service = CustomerService::new(setup_test_db().await);
        let customer = service
            .create_customer(named("Ann", "ann@example.com"), &Actor::user("u1"))
            .await
            .unwrap();

        assert_eq!(customer.owner_id.as_deref(), Some("u1"));
        assert_eq!(customer.emails(), vec!["ann@example.com"]);
        assert_eq!(customer.display_name(), "Ann");
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected_except_self() {
        let service = CustomerService::new(setup_test_db().await);
        let actor = Actor::user("u1");
        let ann = service
            .create_customer(named("Ann", "ann@example.com"), &actor)
            .await
            .unwrap();

        let err = service
            .create_customer(named("Other", "ann@example.com"), &actor)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Duplicated email");

        // Re-submitting its own email is fine.
        let updated = service
            .update_customer(&ann.id, named("Anna", "ann@example.com"))
            .await
            .unwrap();
        assert_eq!(updated.first_name.as_deref(), Some("Anna"));
    }

    #[tokio::test]
    async fn test_update_leaves_absent_fields() {
        let service = CustomerService::new(setup_test_db().await);
        let ann = service
            .create_customer(
                CustomerInput {
                    first_name: Some("Ann".to_string()),
                    last_name: Some("Lee".to_string()),
                    ..Default::default()
                },
                &Actor::system(),
            )
            .await
            .unwrap();

        let updated = service
            .update_customer(
                &ann.id,
                CustomerInput {
                    description: Some("vip".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name.as_deref(), Some("Ann"));
        assert_eq!(updated.last_name.as_deref(), Some("Lee"));
        assert_eq!(updated.description.as_deref(), Some("vip"));
        assert!(updated.modified_at >= ann.modified_at);
    }

    #[tokio::test]
    async fn test_update_companies_replaces_list() {
        let service = CustomerService::new(setup_test_db().await);
        let ann = service
            .create_customer(named("Ann", "a@x.io"), &Actor::system())
            .await
            .unwrap();

        service
            .update_companies(&ann.id, vec!["c1".into(), "c2".into()])
            .await
            .unwrap();
        let updated = service
            .update_companies(&ann.id, vec!["c3".into(), "c3".into()])
            .await
            .unwrap();

        assert_eq!(updated.company_ids(), vec!["c3"]);
    }

    #[tokio::test]
    async fn test_remove_customer_reports_misses() {
        let service = CustomerService::new(setup_test_db().await);
        let ann = service
            .create_customer(named("Ann", "a@x.io"), &Actor::system())
            .await
            .unwrap();

        assert!(service.remove_customer(&ann.id).await.unwrap());
        assert!(!service.remove_customer(&ann.id).await.unwrap());
    }
}
