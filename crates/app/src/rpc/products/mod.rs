//! Product service RPC contract.

use async_trait::async_trait;
use mockall::automock;

use crate::{rpc::RpcError, status::StatusEnvelope};

mod handler;
pub mod messages;

pub use handler::ProductRpcHandler;
pub use messages::*;

#[automock]
#[async_trait]
pub trait ProductRpc: Send + Sync {
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductResponse, RpcError>;

    async fn get_product(&self, request: GetProductRequest) -> Result<ProductResponse, RpcError>;

    async fn update_product(
        &self,
        request: UpdateProductRequest,
    ) -> Result<ProductResponse, RpcError>;

    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<StatusEnvelope, RpcError>;

    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<ListProductsResponse, RpcError>;
}
