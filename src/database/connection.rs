//! Database connection management

use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use std::time::Duration;
use crate::config::DatabaseConfig;
use crate::utils::errors::PortalError;

pub type DatabasePool = Pool<Postgres>;

const IDLE_TIMEOUT: Duration = Duration::from_secs(600);
const MAX_LIFETIME: Duration = Duration::from_secs(1800);

/// Pool options for the configured limits; nothing is connected yet
pub fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds))
        .idle_timeout(IDLE_TIMEOUT)
        .max_lifetime(MAX_LIFETIME)
}

/// Create the connection pool and make sure the database answers
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, PortalError> {
    let pool = pool_options(config).connect(&config.url).await?;
    health_check(&pool).await?;

    tracing::info!(max_connections = config.max_connections, "Database connection pool created");
    Ok(pool)
}

/// Apply pending schema migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), PortalError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Database migrations completed");
    Ok(())
}

pub async fn health_check(pool: &DatabasePool) -> Result<(), PortalError> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
