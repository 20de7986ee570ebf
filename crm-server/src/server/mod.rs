pub mod app;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Subcommand;
use crm::database::connection::{connect_and_migrate, establish_connection, get_database_url};
use crm::database::migrations::Migrator;
use crm::engages::engages_client;
use crm::AppContext;
use sea_orm_migration::MigratorTrait;
use tracing::info;

#[derive(Subcommand, Debug, Clone, Copy)]
pub enum MigrateDirection {
    Up,
    Down,
    Fresh,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub database: String,
    pub cors_origin: Option<String>,
    pub engages_api_domain: Option<String>,
    pub engages_timeout: Duration,
}

pub async fn start_server(config: ServerConfig) -> Result<()> {
    let database_url = get_database_url(Some(&config.database));
    let db = connect_and_migrate(&database_url).await?;

    let engages = engages_client(config.engages_api_domain.as_deref(), config.engages_timeout)?;
    if config.engages_api_domain.is_none() {
        info!("ENGAGES_API_DOMAIN not set; engages notifications are disabled");
    }

    let app_context = Arc::new(AppContext::new(db, engages));
    let app = app::create_app(app_context, config.cors_origin.as_deref())?;

    log_routes();

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port)).await?;
    info!("Server running on http://0.0.0.0:{}", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}

fn log_routes() {
    info!("API Endpoints:");
    info!("  /health                     - Health check");
    info!("  /graphql                    - GraphQL API & Playground");
}

pub async fn migrate_database(database_path: &str, direction: MigrateDirection) -> Result<()> {
    let database_url = get_database_url(Some(database_path));
    let db = establish_connection(&database_url).await?;

    match direction {
        MigrateDirection::Up => {
            info!("Running migrations up");
            Migrator::up(&db, None).await?;
        }
        MigrateDirection::Down => {
            info!("Running migrations down");
            Migrator::down(&db, None).await?;
        }
        MigrateDirection::Fresh => {
            info!("Running fresh migrations (down then up)");
            Migrator::down(&db, None).await?;
            Migrator::up(&db, None).await?;
        }
    }

    info!("Database migration completed");
    Ok(())
}
