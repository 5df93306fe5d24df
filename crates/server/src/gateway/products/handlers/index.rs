//! Product Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use mesh_app::rpc::products::ListProductsRequest;

use crate::{
    extensions::*,
    gateway::{
        GatewayState, page_window,
        response::{ApiError, ApiReply, Pagination, check},
        wire_int,
    },
};

use super::get::ProductData;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductsResponse {
    /// The products on this page
    pub products: Vec<ProductData>,

    pub pagination: Pagination,
}

/// Product Index Handler
///
/// `search` matches name, description or SKU; `category` narrows by
/// category. Both are substring matches.
#[endpoint(tags("products"), summary = "List Products")]
pub(crate) async fn handler(
    page: QueryParam<String, false>,
    limit: QueryParam<String, false>,
    search: QueryParam<String, false>,
    category: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<ApiReply<ProductsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let window = page_window(page, limit);

    let response = state
        .products
        .list_products(ListProductsRequest {
            page: wire_int(window.page()),
            limit: wire_int(window.limit()),
            search: search.into_inner().unwrap_or_default(),
            category: category.into_inner().unwrap_or_default(),
        })
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to list products"))?;

    check(&response.status)?;

    Ok(ApiReply::ok(
        response.status.message,
        ProductsResponse {
            pagination: Pagination::new(window, response.total),
            products: response.products.into_iter().map(Into::into).collect(),
        },
    ))
}
