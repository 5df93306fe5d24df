//! Product RPC handler: maps domain outcomes onto replies and status codes.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::{
    domain::products::{
        ProductsService, ProductsServiceError,
        models::{ProductFilter, ProductQuery, ProductUuid},
    },
    rpc::{
        Reply, RpcError, RpcMessage,
        products::{
            ProductRpc,
            messages::{
                CreateProductRequest, DeleteProductRequest, GetProductRequest,
                ListProductsRequest, ListProductsResponse, ProductResponse, UpdateProductRequest,
            },
        },
        validation,
    },
    status::{StatusClass, StatusEnvelope},
};

/// Serves the product RPC contract on top of a [`ProductsService`].
#[derive(Clone)]
pub struct ProductRpcHandler {
    service: Arc<dyn ProductsService>,
}

impl std::fmt::Debug for ProductRpcHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductRpcHandler").finish_non_exhaustive()
    }
}

fn classify(error: &ProductsServiceError) -> StatusClass {
    match error {
        ProductsServiceError::NotFound => StatusClass::NotFound,
        ProductsServiceError::AlreadyExists(_) => StatusClass::Conflict,
        ProductsServiceError::Repository { .. } => StatusClass::Internal,
    }
}

fn failed<T: RpcMessage>(operation: &str, error: &ProductsServiceError) -> Reply<T> {
    let class = classify(error);

    if class == StatusClass::Internal {
        warn!(operation, %error, "product rpc failed");
    }

    Reply::failed(class, error.to_string())
}

fn parse_id<T: RpcMessage>(id: &str) -> Result<ProductUuid, Reply<T>> {
    id.parse().map_err(|error| {
        Reply::failed(
            StatusClass::InvalidInput,
            format!("invalid product id {id:?}: {error}"),
        )
    })
}

impl ProductRpcHandler {
    #[must_use]
    pub fn new(service: Arc<dyn ProductsService>) -> Self {
        Self { service }
    }

    pub async fn handle_create(&self, request: CreateProductRequest) -> Reply<ProductResponse> {
        if let Err(error) = validation::create_product(&request) {
            return Reply::failed(StatusClass::InvalidInput, error.to_string());
        }

        match self.service.create_product(request.into()).await {
            Ok(product) => Reply::ok(ProductResponse {
                product: Some(product.into()),
                status: StatusEnvelope::ok("Product created successfully"),
            }),
            Err(error) => failed("create", &error),
        }
    }

    pub async fn handle_get(&self, request: GetProductRequest) -> Reply<ProductResponse> {
        let product = match parse_id(&request.id) {
            Ok(product) => product,
            Err(reply) => return reply,
        };

        match self.service.get_product(product).await {
            Ok(product) => Reply::ok(ProductResponse {
                product: Some(product.into()),
                status: StatusEnvelope::ok("Product retrieved successfully"),
            }),
            Err(error) => failed("get", &error),
        }
    }

    pub async fn handle_update(&self, request: UpdateProductRequest) -> Reply<ProductResponse> {
        let product = match parse_id(&request.id) {
            Ok(product) => product,
            Err(reply) => return reply,
        };

        if let Err(error) = validation::update_product(&request) {
            return Reply::failed(StatusClass::InvalidInput, error.to_string());
        }

        match self.service.update_product(product, request.into()).await {
            Ok(product) => Reply::ok(ProductResponse {
                product: Some(product.into()),
                status: StatusEnvelope::ok("Product updated successfully"),
            }),
            Err(error) => failed("update", &error),
        }
    }

    pub async fn handle_delete(&self, request: DeleteProductRequest) -> Reply<StatusEnvelope> {
        let product = match parse_id(&request.id) {
            Ok(product) => product,
            Err(reply) => return reply,
        };

        match self.service.delete_product(product).await {
            Ok(()) => Reply::ok(StatusEnvelope::ok("Product deleted successfully")),
            Err(error) => failed("delete", &error),
        }
    }

    pub async fn handle_list(&self, request: ListProductsRequest) -> Reply<ListProductsResponse> {
        let query = ProductQuery {
            page: i64::from(request.page),
            limit: i64::from(request.limit),
            filter: ProductFilter {
                search: request.search,
                category: request.category,
            },
        };

        match self.service.list_products(query).await {
            Ok(page) => Reply::ok(ListProductsResponse {
                total: i64::try_from(page.total).unwrap_or(i64::MAX),
                products: page.items.into_iter().map(Into::into).collect(),
                status: StatusEnvelope::ok("Products retrieved successfully"),
            }),
            Err(error) => failed("list", &error),
        }
    }
}

#[async_trait]
impl ProductRpc for ProductRpcHandler {
    async fn create_product(
        &self,
        request: CreateProductRequest,
    ) -> Result<ProductResponse, RpcError> {
        self.handle_create(request).await.into_result()
    }

    async fn get_product(&self, request: GetProductRequest) -> Result<ProductResponse, RpcError> {
        self.handle_get(request).await.into_result()
    }

    async fn update_product(
        &self,
        request: UpdateProductRequest,
    ) -> Result<ProductResponse, RpcError> {
        self.handle_update(request).await.into_result()
    }

    async fn delete_product(
        &self,
        request: DeleteProductRequest,
    ) -> Result<StatusEnvelope, RpcError> {
        self.handle_delete(request).await.into_result()
    }

    async fn list_products(
        &self,
        request: ListProductsRequest,
    ) -> Result<ListProductsResponse, RpcError> {
        self.handle_list(request).await.into_result()
    }
}
