//! RPC clients used by the gateway to reach the domain services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Serialize, de::DeserializeOwned};

use mesh_app::{
    rpc::{
        RpcError, RpcStatus,
        products::{
            CreateProductRequest, DeleteProductRequest, GetProductRequest, ListProductsRequest,
            ListProductsResponse, ProductResponse, ProductRpc, UpdateProductRequest,
        },
        users::{
            CreateUserRequest, DeleteUserRequest, GetUserRequest, ListUsersRequest,
            ListUsersResponse, UpdateUserRequest, UserResponse, UserRpc,
        },
    },
    status::StatusEnvelope,
};

use crate::rpc::wire;

/// JSON-over-HTTP transport to one service.
#[derive(Debug, Clone)]
pub(crate) struct RpcClient {
    base_url: String,
    http: Client,
}

impl RpcClient {
    /// Every call made through the client must finish within `timeout`.
    pub(crate) fn new(
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::builder().timeout(timeout).build()?,
        })
    }

    async fn call<Req, Resp>(
        &self,
        service: &str,
        method: &str,
        request: &Req,
    ) -> Result<Resp, RpcError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, wire::path(service, method));

        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(unavailable)?;

        let raised = wire::decode_status(
            header(&response, wire::CODE_HEADER),
            header(&response, wire::MESSAGE_HEADER),
        );
        let delivered = response.status().is_success();
        let body = response.bytes().await.map_err(unavailable)?;

        read_reply(raised, delivered, &body)
    }
}

fn header<'a>(response: &'a Response, name: &str) -> Option<&'a str> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
}

fn unavailable(error: reqwest::Error) -> RpcError {
    RpcError::Unavailable(error.to_string())
}

/// A raised status wins over the body. Anything else that is not a
/// decodable 2xx reply means the service could not be used.
fn read_reply<Resp>(
    raised: Option<RpcStatus>,
    delivered: bool,
    body: &[u8],
) -> Result<Resp, RpcError>
where
    Resp: DeserializeOwned,
{
    if let Some(status) = raised {
        return Err(RpcError::Status(status));
    }

    if !delivered {
        return Err(RpcError::Unavailable(format!(
            "unexpected reply: {}",
            String::from_utf8_lossy(body)
        )));
    }

    serde_json::from_slice(body)
        .map_err(|error| RpcError::Unavailable(format!("undecodable reply: {error}")))
}

/// Client for the user service.
#[derive(Debug, Clone)]
pub(crate) struct UserRpcClient {
    rpc: RpcClient,
}

impl UserRpcClient {
    pub(crate) fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl UserRpc for UserRpcClient {
    async fn create_user(&self, request: CreateUserRequest) -> Result<UserResponse, RpcError> {
        self.rpc
            .call(wire::USER_SERVICE, wire::CREATE_USER, &request)
            .await
    }

    async fn get_user(&self, request: GetUserRequest) -> Result<UserResponse, RpcError> {
        self.rpc
            .call(wire::USER_SERVICE, wire::GET_USER, &request)
            .await
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<UserResponse, RpcError> {
        self.rpc
            .call(wire::USER_SERVICE, wire::UPDATE_USER, &request)
            .await
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<StatusEnvelope, RpcError> {
        self.rpc
            .call(wire::USER_SERVICE, wire::DELETE_USER, &request)
            .await
    }

    async fn list_users(&self, request: ListUsersRequest) -> Result<ListUsersResponse, RpcError> {
        self.rpc
            .call(wire::USER_SERVICE, wire::LIST_USERS, &request)
            .await
    }
}

/// Client for the product service.
#[derive(Debug, Clone)]
pub(crate) struct ProductRpcClient {
    rpc: RpcClient,
}

impl ProductRpcClient {
    pub(crate) fn new(rpc: RpcClient) -> Self {
        Self { rpc }
    }
}

#[async_trait]
impl ProductRpc for ProductRpcClient {
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductResponse, RpcError> {
        self.rpc
            .call(wire::PRODUCT_SERVICE, wire::CREATE_PRODUCT, &request)
            .await
    }

    async fn get_product(&self, request: GetProductRequest) -> Result<ProductResponse, RpcError> {
        self.rpc
            .call(wire::PRODUCT_SERVICE, wire::GET_PRODUCT, &request)
            .await
    }

    async fn update_product(
        &self,
        request: UpdateProductRequest,
    ) -> Result<ProductResponse, RpcError> {
        self.rpc
            .call(wire::PRODUCT_SERVICE, wire::UPDATE_PRODUCT, &request)
            .await
    }

    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<StatusEnvelope, RpcError> {
        self.rpc
            .call(wire::PRODUCT_SERVICE, wire::DELETE_PRODUCT, &request)
            .await
    }

    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<ListProductsResponse, RpcError> {
        self.rpc
            .call(wire::PRODUCT_SERVICE, wire::LIST_PRODUCTS, &request)
            .await
    }
}
