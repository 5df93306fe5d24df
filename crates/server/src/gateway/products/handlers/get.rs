//! Get Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use mesh_app::{
    rpc::products::{GetProductRequest, ProductMessage, ProductResponse},
    status::StatusClass,
};

use crate::{
    extensions::*,
    gateway::{
        GatewayState,
        response::{ApiError, ApiReply, check},
    },
};

/// A product as the gateway returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductData {
    /// The unique identifier of the product
    pub id: String,

    pub name: String,

    pub description: String,

    /// Unit price, always positive
    pub price: f64,

    /// Units in stock
    pub quantity: i32,

    pub category: String,

    /// Stock keeping unit, unique across products
    pub sku: String,

    /// Seconds since the Unix epoch
    pub created_at: i64,

    /// Seconds since the Unix epoch
    pub updated_at: i64,
}

impl From<ProductMessage> for ProductData {
    fn from(product: ProductMessage) -> Self {
        ProductData {
            id: product.id,
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            sku: product.sku,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Split a single-product reply into its message and payload.
pub(super) fn into_product(response: ProductResponse) -> Result<(String, ProductData), ApiError> {
    check(&response.status)?;

    let product = response.product.ok_or_else(|| {
        ApiError::new(StatusClass::Internal, "product service returned no product")
    })?;

    Ok((response.status.message, product.into()))
}

/// Get Product Handler
#[endpoint(
    tags("products"),
    summary = "Get Product",
    responses(
        (status_code = StatusCode::OK, description = "Product found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed product id"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<ApiReply<ProductData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let response = state
        .products
        .get_product(GetProductRequest {
            id: id.into_inner(),
        })
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to get product"))?;

    let (message, product) = into_product(response)?;

    Ok(ApiReply::ok(message, product))
}
