pub mod activity_log;
pub mod customer;
pub mod deal;
pub mod messenger_app;
pub mod product;
pub mod product_category;
pub mod user;

pub use activity_log::ActivityLog;
pub use customer::{Customer, CustomerFieldsInput};
pub use deal::{Deal, DealAddInput, DealProductLine, ProductLineInput};
pub use messenger_app::{MessengerApp, MessengerAppAddInput, MessengerAppKind};
pub use product::{Product, ProductAddInput, ProductEditInput, ProductType};
pub use product_category::{ProductCategory, ProductCategoryAddInput, ProductCategoryEditInput};
pub use user::{User, UserAddInput};

use serde_json::Value;

/// Stored JSON text as a GraphQL JSON value; unreadable text becomes null.
pub(crate) fn json_text(raw: &str) -> async_graphql::Json<Value> {
    async_graphql::Json(serde_json::from_str(raw).unwrap_or(Value::Null))
}
