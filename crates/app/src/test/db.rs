//! Database test utilities and shared infrastructure

use once_cell::sync::Lazy;
use sqlx::{Connection, PgConnection, PgPool};
use testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres as PostgresImage;
use tokio::sync::{OnceCell, mpsc};

const USER: &str = "mesh_test";
const PASSWORD: &str = "mesh_test_password";

/// Database names are interpolated into DDL, so only a safe subset is allowed.
fn validate_database_name(name: &str) -> Result<(), String> {
    if name.is_empty() || name.len() > 63 {
        return Err("Database name must be 1-63 characters long".to_string());
    }

    if !name.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_') {
        return Err("Database name must start with a letter or underscore".to_string());
    }

    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err("Database name can only contain letters, digits and underscores".to_string());
    }

    Ok(())
}

async fn init_postgres_container() -> ContainerAsync<PostgresImage> {
    PostgresImage::default()
        .with_user(USER)
        .with_password(PASSWORD)
        .with_db_name("mesh_test")
        .with_env_var("POSTGRES_INITDB_ARGS", "--auth-host=trust")
        .start()
        .await
        .expect("Failed to start PostgreSQL container")
}

/// Started once and shared by every test in the binary.
static POSTGRES_CONTAINER: Lazy<OnceCell<ContainerAsync<PostgresImage>>> = Lazy::new(OnceCell::new);

static CLEANUP_SENDER: Lazy<OnceCell<mpsc::UnboundedSender<String>>> = Lazy::new(OnceCell::new);

async fn init_cleanup_task() -> mpsc::UnboundedSender<String> {
    let (sender, mut receiver) = mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        while let Some(db_name) = receiver.recv().await {
            if let Err(err) = cleanup_database(&db_name).await {
                eprintln!("Failed to cleanup database '{db_name}': {err}");
            }
        }
    });

    sender
}

async fn server_url(database: &str) -> String {
    let container = POSTGRES_CONTAINER
        .get_or_init(init_postgres_container)
        .await;

    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get container port");

    let host =
        std::env::var("TESTCONTAINERS_HOST_OVERRIDE").unwrap_or_else(|_| "localhost".to_string());

    format!("postgresql://{USER}:{PASSWORD}@{host}:{port}/{database}")
}

async fn cleanup_database(db_name: &str) -> Result<(), sqlx::Error> {
    if validate_database_name(db_name).is_err() {
        return Ok(());
    }

    let mut conn = PgConnection::connect(&server_url("postgres").await).await?;

    sqlx::query(&format!("DROP DATABASE IF EXISTS \"{db_name}\""))
        .execute(&mut conn)
        .await?;

    conn.close().await
}

/// A uniquely named, fully migrated database inside the shared container.
/// Dropped in the background when the value goes out of scope.
#[derive(Debug, Clone)]
pub struct TestDb {
    pool: PgPool,
    name: String,
}

impl Drop for TestDb {
    fn drop(&mut self) {
        if let Some(sender) = CLEANUP_SENDER.get() {
            let _ = sender.send(self.name.clone());
        }
    }
}

impl TestDb {
    pub async fn new() -> Self {
        CLEANUP_SENDER.get_or_init(init_cleanup_task).await;

        let name = format!("mesh_test_{}", uuid::Uuid::now_v7().simple());

        validate_database_name(&name).expect("generated database name is valid");

        let mut conn = PgConnection::connect(&server_url("postgres").await)
            .await
            .expect("Failed to connect to postgres database");

        sqlx::query(&format!("CREATE DATABASE \"{name}\""))
            .execute(&mut conn)
            .await
            .expect("Failed to create test database");

        conn.close()
            .await
            .expect("Failed to close admin connection");

        let pool = PgPool::connect(&server_url(&name).await)
            .await
            .expect("Failed to create pool for database");

        crate::database::migrate(&pool)
            .await
            .expect("Failed to run migrations on database");

        Self { pool, name }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_identifiers() {
        assert!(validate_database_name("mesh_test_0193").is_ok());
        assert!(validate_database_name("_leading").is_ok());
    }

    #[test]
    fn rejects_unsafe_identifiers() {
        assert!(validate_database_name("").is_err());
        assert!(validate_database_name(&"a".repeat(64)).is_err());
        assert!(validate_database_name("1starts_with_digit").is_err());
        assert!(validate_database_name("has-hyphen").is_err());
        assert!(validate_database_name("quote\"d").is_err());
    }

    #[tokio::test]
    async fn container_accepts_queries() {
        let test_db = TestDb::new().await;

        let result: i32 = sqlx::query_scalar("SELECT 1")
            .fetch_one(test_db.pool())
            .await
            .expect("Failed to execute test query");

        assert_eq!(result, 1);
    }
}
