//! Database connection management

use sqlx::{Pool, Postgres};
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::utils::errors::AvangardError;

pub type DatabasePool = Pool<Postgres>;

/// Create a new database connection pool.
///
/// The 5 second acquire timeout is the only deadline in the system; no
/// operation-level timeouts are layered on top of it.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DatabasePool, AvangardError> {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await?;

    // Probe the connection before declaring the pool usable
    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run database migrations
pub async fn run_migrations(pool: &DatabasePool) -> Result<(), AvangardError> {
    tracing::info!("Running database migrations...");

    sqlx::migrate!("./migrations").run(pool).await?;

    tracing::info!("Database migrations completed successfully");
    Ok(())
}
