//! User service RPC contract.

use async_trait::async_trait;
use mockall::automock;

use crate::{rpc::RpcError, status::StatusEnvelope};

mod handler;
pub mod messages;

pub use handler::UserRpcHandler;
pub use messages::*;

#[automock]
#[async_trait]
pub trait UserRpc: Send + Sync {
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, RpcError>;

    async fn get_user(&self, request: GetUserRequest) -> Result<UserResponse, RpcError>;

    async fn update_user(&self, request: UpdateUserRequest) -> Result<UserResponse, RpcError>;

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<StatusEnvelope, RpcError>;

    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersResponse, RpcError>;
}
