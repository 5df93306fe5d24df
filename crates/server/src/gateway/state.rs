//! Gateway State

use std::sync::Arc;

use mesh_app::rpc::{products::ProductRpc, users::UserRpc};

use crate::{
    config::upstream::UpstreamConfig,
    rpc::client::{ProductRpcClient, RpcClient, UserRpcClient},
};

/// The RPC contracts the gateway relays to.
#[derive(Clone)]
pub(crate) struct GatewayState {
    pub(crate) users: Arc<dyn UserRpc>,
    pub(crate) products: Arc<dyn ProductRpc>,
}

impl std::fmt::Debug for GatewayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayState").finish_non_exhaustive()
    }
}

impl GatewayState {
    #[must_use]
    pub(crate) fn new(users: Arc<dyn UserRpc>, products: Arc<dyn ProductRpc>) -> Arc<Self> {
        Arc::new(Self { users, products })
    }

    /// Network clients for both domain services.
    pub(crate) fn connect(upstream: &UpstreamConfig) -> Result<Arc<Self>, reqwest::Error> {
        let timeout = upstream.rpc_timeout();

        let users = UserRpcClient::new(RpcClient::new(upstream.user_service_url(), timeout)?);
        let products =
            ProductRpcClient::new(RpcClient::new(upstream.product_service_url(), timeout)?);

        Ok(Self::new(Arc::new(users), Arc::new(products)))
    }
}
