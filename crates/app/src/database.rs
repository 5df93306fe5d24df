//! Database connection management

use std::time::Duration;

use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use tracing::info;

/// Connect to `PostgreSQL`, waiting at most `timeout` for a connection.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str, timeout: Duration) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .acquire_timeout(timeout)
        .connect(database_url)
        .await
}

/// Apply any pending migrations.
///
/// # Errors
///
/// Returns an error when a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await?;

    info!("database migrations applied");

    Ok(())
}
