//! Create Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use mesh_app::rpc::{products, validation};

use crate::{
    extensions::*,
    gateway::{
        GatewayState,
        response::{ApiError, ApiReply},
    },
};

use super::get::{ProductData, into_product};

/// Create Product Request
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct CreateProductRequest {
    pub name: String,

    pub description: String,

    /// Must be greater than zero
    pub price: f64,

    /// Must not be negative
    pub quantity: i32,

    pub category: String,

    pub sku: String,
}

impl From<CreateProductRequest> for products::CreateProductRequest {
    fn from(request: CreateProductRequest) -> Self {
        products::CreateProductRequest {
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
            category: request.category,
            sku: request.sku,
        }
    }
}

/// Create Product Handler
#[endpoint(
    tags("products"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::CONFLICT, description = "SKU already taken"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Product service failure"),
    ),
)]
#[tracing::instrument(name = "gateway.products.create", skip_all)]
pub(crate) async fn handler(
    json: JsonBody<CreateProductRequest>,
    depot: &mut Depot,
) -> Result<ApiReply<ProductData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let request = products::CreateProductRequest::from(json.into_inner());

    validation::create_product(&request).map_err(ApiError::invalid_request)?;

    let response = state
        .products
        .create_product(request)
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to create product"))?;

    let (message, product) = into_product(response)?;

    Ok(ApiReply::created(message, product))
}
