//! Delete Product Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use mesh_app::rpc::products::DeleteProductRequest;

use crate::{
    extensions::*,
    gateway::{
        GatewayState,
        response::{ApiError, ApiReply, NoData, check},
    },
};

/// Delete Product Handler
#[endpoint(
    tags("products"),
    summary = "Delete Product",
    responses(
        (status_code = StatusCode::OK, description = "Product deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<ApiReply<NoData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let status = state
        .products
        .delete_product(DeleteProductRequest {
            id: id.into_inner(),
        })
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to delete product"))?;

    check(&status)?;

    Ok(ApiReply::empty(status.message))
}
