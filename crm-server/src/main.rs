use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use crm_server::server::{self, MigrateDirection, ServerConfig};
use tracing::info;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(author, version, about)]
struct ServerArgs {
    #[clap(short, long, global = true, env = "CRM_LOG_LEVEL")]
    log_level: Option<String>,
    #[clap(short, long, default_value = "3000", env = "CRM_PORT")]
    port: u16,
    #[clap(short, long, default_value = "crm.db", global = true, env = "CRM_DATABASE")]
    database: String,
    #[clap(long, env = "CRM_CORS_ORIGIN")]
    cors_origin: Option<String>,
    /// Base URL of the engages service; notifications are skipped when unset
    #[clap(long, env = "ENGAGES_API_DOMAIN")]
    engages_api_domain: Option<String>,
    #[clap(long, default_value = "10", env = "ENGAGES_TIMEOUT_SECS")]
    engages_timeout_secs: u64,
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Apply or roll back database migrations, then exit
    Migrate {
        #[clap(subcommand)]
        direction: MigrateDirection,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = ServerArgs::parse();
    setup_logging(&args.log_level);

    if let Some(Command::Migrate { direction }) = args.command {
        return server::migrate_database(&args.database, direction).await;
    }

    info!("Starting server on port {}", args.port);
    server::start_server(ServerConfig {
        port: args.port,
        database: args.database,
        cors_origin: args.cors_origin,
        engages_api_domain: args.engages_api_domain,
        engages_timeout: Duration::from_secs(args.engages_timeout_secs),
    })
    .await?;

    Ok(())
}

fn setup_logging(log_level: &Option<String>) {
    let log_level = match log_level
        .as_deref()
        .unwrap_or("info")
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!("sqlx=warn,{}", log_level)))
        .without_time()
        .init();
}
