mod application;
mod config;
mod domain;
mod infrastructure;
mod presentation;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::infrastructure::{AppContainer, create_connection_pool, run_migrations};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let db_pool = create_connection_pool(&config.database_url)?;
    let applied = run_migrations(&db_pool)?;
    tracing::info!(applied, "Database migrations complete");

    let container = AppContainer::new(&config, db_pool).await?;

    tracing::info!(
        chat_model = %config.openai.chat_model,
        embedding_model = %config.openai.embedding_model,
        port = config.port,
        "Starting policy assistant"
    );

    container.http_server().run().await?;

    Ok(())
}
