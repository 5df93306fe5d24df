//! Server configuration module

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::config::{
    cache::CacheConfig, db::DatabaseConfig, gateway::GatewayConfig,
    observability::LoggingConfig, upstream::UpstreamConfig,
};

pub(crate) mod cache;
pub(crate) mod db;
pub(crate) mod docs;
pub(crate) mod gateway;
pub(crate) mod observability;
pub(crate) mod upstream;

pub(crate) use observability::LogFormat;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is required when the postgres store is selected")]
    MissingDatabaseUrl,
}

/// Mesh server configuration
#[derive(Debug, Parser)]
#[command(name = "mesh", about = "User and product services behind an HTTP gateway", long_about = None)]
pub struct ServerConfig {
    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Domain service addresses.
    #[command(flatten)]
    pub upstream: UpstreamConfig,

    /// Which tier to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by both domain services.
#[derive(Debug, clap::Args)]
pub struct ServiceConfig {
    #[command(flatten)]
    pub database: DatabaseConfig,

    #[command(flatten)]
    pub cache: CacheConfig,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP gateway.
    Gateway(GatewayConfig),

    /// Run the user RPC service.
    Users(ServiceConfig),

    /// Run the product RPC service.
    Products(ServiceConfig),
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Name of the tier being run, for log fields.
    pub fn service_name(&self) -> &'static str {
        match self.command {
            Command::Gateway(_) => "gateway",
            Command::Users(_) => "user-service",
            Command::Products(_) => "product-service",
        }
    }
}
