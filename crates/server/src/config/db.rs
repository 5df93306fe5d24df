//! Database Config

use std::time::Duration;

use clap::Args;

use mesh_app::context::StoreSettings;

use crate::config::ConfigError;

/// Record store backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum StoreKind {
    /// `PostgreSQL`, migrated on startup.
    Postgres,

    /// Process-local maps; contents are lost on exit.
    Memory,
}

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// Record store backend (postgres, memory)
    #[arg(long, env = "STORE", value_enum, default_value_t = StoreKind::Postgres)]
    pub store: StoreKind,

    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Seconds to wait for a pooled connection
    #[arg(long, env = "DATABASE_TIMEOUT_SECONDS", default_value_t = 30)]
    pub database_timeout_seconds: u64,
}

impl DatabaseConfig {
    /// Resolve the store the domain service should use.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when the postgres store is
    /// selected without a connection string.
    pub fn store_settings(&self) -> Result<StoreSettings, ConfigError> {
        match self.store {
            StoreKind::Memory => Ok(StoreSettings::Memory),
            StoreKind::Postgres => {
                let url = self
                    .database_url
                    .clone()
                    .filter(|url| !url.trim().is_empty())
                    .ok_or(ConfigError::MissingDatabaseUrl)?;

                Ok(StoreSettings::Postgres {
                    url,
                    timeout: Duration::from_secs(self.database_timeout_seconds),
                })
            }
        }
    }
}
