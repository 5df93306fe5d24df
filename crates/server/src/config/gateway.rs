//! Gateway Config

use clap::Args;

use crate::config::docs::DocsConfig;

/// Gateway listener settings.
#[derive(Debug, Args)]
pub struct GatewayConfig {
    /// Gateway host address
    #[arg(long, env = "GATEWAY_HOST", default_value = "0.0.0.0")]
    pub gateway_host: String,

    /// Gateway port
    #[arg(long, env = "GATEWAY_PORT", default_value_t = 8080)]
    pub gateway_port: u16,

    /// API docs settings.
    #[command(flatten)]
    pub docs: DocsConfig,
}

impl GatewayConfig {
    /// Get the socket address for binding.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.gateway_host, self.gateway_port)
    }
}
