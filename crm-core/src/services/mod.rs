pub mod activity_log_service;
pub mod customer_service;
pub mod deal_service;
pub mod messenger_app_service;
pub mod product_category_service;
pub mod product_service;
pub mod user_service;

pub use activity_log_service::{ActivityLogService, LogAction, LogEntry};
pub use customer_service::{CustomerInput, CustomerService, MergeOutcome};
pub use deal_service::{DealProductLineInput, DealService};
pub use messenger_app_service::{MessengerAppInput, MessengerAppService};
pub use product_category_service::{
    ProductCategoryInput, ProductCategoryService, ProductCategoryUpdate,
};
pub use product_service::{ProductInput, ProductService, ProductUpdate};
pub use user_service::{NewUser, UserService};

use crate::errors::{CoreError, CoreResult};

/// Rejects empty or whitespace-only required text.
pub(crate) fn require_text(value: &str, field: &str) -> CoreResult<()> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(format!("{} is required", field)).with_field("field", field));
    }
    Ok(())
}

/// Treats blank optional text as absent.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
