//! Domain service addresses.
//!
//! The same settings tell a domain service where to listen and the gateway
//! where to call it.

use std::time::Duration;

use clap::Args;

/// Addresses of the user and product services.
#[derive(Debug, Clone, Args)]
pub struct UpstreamConfig {
    /// User service host
    #[arg(long, env = "USER_SERVICE_HOST", default_value = "127.0.0.1", global = true)]
    pub user_service_host: String,

    /// User service port
    #[arg(long, env = "USER_SERVICE_PORT", default_value_t = 50051, global = true)]
    pub user_service_port: u16,

    /// Product service host
    #[arg(
        long,
        env = "PRODUCT_SERVICE_HOST",
        default_value = "127.0.0.1",
        global = true
    )]
    pub product_service_host: String,

    /// Product service port
    #[arg(long, env = "PRODUCT_SERVICE_PORT", default_value_t = 50052, global = true)]
    pub product_service_port: u16,

    /// Deadline applied to every RPC call, in seconds
    #[arg(long, env = "RPC_TIMEOUT_SECONDS", default_value_t = 10, global = true)]
    pub rpc_timeout_seconds: u64,
}

impl UpstreamConfig {
    #[must_use]
    pub fn user_service_addr(&self) -> String {
        format!("{}:{}", self.user_service_host, self.user_service_port)
    }

    #[must_use]
    pub fn product_service_addr(&self) -> String {
        format!("{}:{}", self.product_service_host, self.product_service_port)
    }

    #[must_use]
    pub fn user_service_url(&self) -> String {
        format!("http://{}", self.user_service_addr())
    }

    #[must_use]
    pub fn product_service_url(&self) -> String {
        format!("http://{}", self.product_service_addr())
    }

    #[must_use]
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }
}
