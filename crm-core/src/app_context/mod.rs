use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::auth::{Actor, Authorizer, PermissionAuthorizer};
use crate::engages::EngagesApi;
use crate::errors::CoreResult;
use crate::services::{
    ActivityLogService, CustomerService, DealService, MessengerAppService, ProductCategoryService,
    ProductService, UserService,
};

mod activity_log_operations;
mod customer_operations;
mod deal_operations;
mod messenger_app_operations;
mod product_operations;
mod user_operations;

/// Shared application context exposing the CRM services to the GraphQL layer.
///
/// Every operation takes the request [`Actor`] and checks its permission
/// action before touching the store. Successful writes are recorded in the
/// activity log.
#[derive(Clone)]
pub struct AppContext {
    db: DatabaseConnection,
    authorizer: Arc<dyn Authorizer>,
    engages: Arc<dyn EngagesApi>,
    customer_service: Arc<CustomerService>,
    product_service: Arc<ProductService>,
    product_category_service: Arc<ProductCategoryService>,
    deal_service: Arc<DealService>,
    messenger_app_service: Arc<MessengerAppService>,
    user_service: Arc<UserService>,
    activity_log_service: Arc<ActivityLogService>,
}

impl AppContext {
    pub fn new(db: DatabaseConnection, engages: Arc<dyn EngagesApi>) -> Self {
        Self::with_authorizer(db, engages, Arc::new(PermissionAuthorizer::from_env()))
    }

    pub fn with_authorizer(
        db: DatabaseConnection,
        engages: Arc<dyn EngagesApi>,
        authorizer: Arc<dyn Authorizer>,
    ) -> Self {
        let customer_service = Arc::new(CustomerService::new(db.clone()));
        let product_service = Arc::new(ProductService::new(db.clone()));
        let product_category_service = Arc::new(ProductCategoryService::new(db.clone()));
        let deal_service = Arc::new(DealService::new(db.clone()));
        let messenger_app_service = Arc::new(MessengerAppService::new(db.clone()));
        let user_service = Arc::new(UserService::new(db.clone()));
        let activity_log_service = Arc::new(ActivityLogService::new(db.clone()));

        Self {
            db,
            authorizer,
            engages,
            customer_service,
            product_service,
            product_category_service,
            deal_service,
            messenger_app_service,
            user_service,
            activity_log_service,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn engages(&self) -> &Arc<dyn EngagesApi> {
        &self.engages
    }

    pub fn customer_service(&self) -> &Arc<CustomerService> {
        &self.customer_service
    }

    pub fn product_service(&self) -> &Arc<ProductService> {
        &self.product_service
    }

    pub fn product_category_service(&self) -> &Arc<ProductCategoryService> {
        &self.product_category_service
    }

    pub fn deal_service(&self) -> &Arc<DealService> {
        &self.deal_service
    }

    pub fn messenger_app_service(&self) -> &Arc<MessengerAppService> {
        &self.messenger_app_service
    }

    pub fn user_service(&self) -> &Arc<UserService> {
        &self.user_service
    }

    pub fn activity_log_service(&self) -> &Arc<ActivityLogService> {
        &self.activity_log_service
    }

    fn authorize(&self, actor: &Actor, action: &str) -> CoreResult<()> {
        self.authorizer.authorize(actor, action)
    }
}
