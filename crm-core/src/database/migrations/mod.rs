pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_users;
mod m20240601_000002_create_customers;
mod m20240601_000003_create_products;
mod m20240601_000004_create_deals;
mod m20240601_000005_create_messenger_apps;
mod m20240601_000006_create_activity_logs;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_users::Migration),
            Box::new(m20240601_000002_create_customers::Migration),
            Box::new(m20240601_000003_create_products::Migration),
            Box::new(m20240601_000004_create_deals::Migration),
            Box::new(m20240601_000005_create_messenger_apps::Migration),
            Box::new(m20240601_000006_create_activity_logs::Migration),
        ]
    }
}
