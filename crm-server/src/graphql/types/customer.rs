use async_graphql::*;
use chrono::{DateTime, Utc};
use crm::database::entities::customers;
use crm::services::CustomerInput;
use serde_json::{Map, Value};

use super::json_text;

#[derive(SimpleObject)]
pub struct Customer {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    pub emails: Vec<String>,
    pub primary_phone: Option<String>,
    pub phones: Vec<String>,
    pub code: Option<String>,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub do_not_disturb: bool,
    pub tag_ids: Vec<String>,
    pub company_ids: Vec<String>,
    pub custom_fields_data: Json<Value>,
    pub merged_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl From<customers::Model> for Customer {
    fn from(model: customers::Model) -> Self {
        Self {
            emails: model.emails(),
            phones: model.phones(),
            tag_ids: model.tag_ids(),
            company_ids: model.company_ids(),
            merged_ids: model.merged_ids(),
            custom_fields_data: json_text(&model.custom_fields_data),
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            primary_email: model.primary_email,
            primary_phone: model.primary_phone,
            code: model.code,
            owner_id: model.owner_id,
            description: model.description,
            do_not_disturb: model.do_not_disturb,
            created_at: model.created_at,
            modified_at: model.modified_at,
        }
    }
}

/// Customer document used by add, edit and merge. Omitted fields are left
/// untouched on edit.
#[derive(InputObject, Default)]
pub struct CustomerFieldsInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub primary_email: Option<String>,
    pub emails: Option<Vec<String>>,
    pub primary_phone: Option<String>,
    pub phones: Option<Vec<String>>,
    pub code: Option<String>,
    pub owner_id: Option<String>,
    pub description: Option<String>,
    pub do_not_disturb: Option<bool>,
    pub tag_ids: Option<Vec<String>>,
    pub custom_fields_data: Option<Json<Map<String, Value>>>,
}

impl From<CustomerFieldsInput> for CustomerInput {
    fn from(input: CustomerFieldsInput) -> Self {
        Self {
            first_name: input.first_name,
            last_name: input.last_name,
            primary_email: input.primary_email,
            emails: input.emails,
            primary_phone: input.primary_phone,
            phones: input.phones,
            code: input.code,
            owner_id: input.owner_id,
            description: input.description,
            do_not_disturb: input.do_not_disturb,
            tag_ids: input.tag_ids,
            custom_fields_data: input.custom_fields_data.map(|data| data.0),
        }
    }
}
