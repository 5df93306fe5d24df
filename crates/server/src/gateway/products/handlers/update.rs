//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
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

/// Update Product Request
///
/// Zero prices and quantities, and empty strings, leave the stored values
/// unchanged. The SKU cannot be changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub(crate) struct UpdateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
}

impl UpdateProductRequest {
    fn for_product(self, id: String) -> products::UpdateProductRequest {
        products::UpdateProductRequest {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            quantity: self.quantity,
            category: self.category,
        }
    }
}

/// Update Product Handler
#[endpoint(
    tags("products"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
    ),
)]
#[tracing::instrument(name = "gateway.products.update", skip_all)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateProductRequest>,
    depot: &mut Depot,
) -> Result<ApiReply<ProductData>, ApiError> {
    let state = depot.obtain_or_500::<Arc<GatewayState>>()?;

    let request = json.into_inner().for_product(id.into_inner());

    validation::update_product(&request).map_err(ApiError::invalid_request)?;

    let response = state
        .products
        .update_product(request)
        .await
        .map_err(|error| ApiError::from_rpc(error, "Failed to update product"))?;

    let (message, product) = into_product(response)?;

    Ok(ApiReply::ok(message, product))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use mesh_app::rpc::products::MockProductRpc;

    use crate::test_helpers::{in_memory_gateway, products_gateway};

    use super::{
        super::tests::{create_product, hammer},
        *,
    };

    #[tokio::test]
    async fn test_partial_update_keeps_unset_fields() -> TestResult {
        let service = in_memory_gateway();

        let created = create_product(&service, &hammer("HAM-1")).await?;
        let id = created["data"]["id"].as_str().ok_or("missing id")?;

        let mut res = TestClient::put(format!("http://example.com/api/v1/products/{id}"))
            .json(&json!({ "name": "", "price": 10.0 }))
            .send(&service)
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body["data"]["name"], json!("Hammer"));
        assert_eq!(body["data"]["price"], json!(10.0));
        assert_eq!(body["data"]["quantity"], json!(4));
        assert_eq!(body["data"]["sku"], json!("HAM-1"));

        Ok(())
    }

    #[tokio::test]
    async fn test_negative_quantities_are_rejected() -> TestResult {
        let mut products = MockProductRpc::new();
        products.expect_update_product().never();

        let mut res = TestClient::put("http://example.com/api/v1/products/abc")
            .json(&json!({ "quantity": -1 }))
            .send(&products_gateway(products))
            .await;

        let body: Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["error"], json!("quantity cannot be negative"));

        Ok(())
    }
}
