//! Product service wire messages.

use serde::{Deserialize, Serialize};

use crate::{
    domain::products::models::{NewProduct, Product, ProductUpdate},
    rpc::RpcMessage,
    status::StatusEnvelope,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMessage {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    pub sku: String,
    /// Seconds since the Unix epoch.
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<Product> for ProductMessage {
    fn from(product: Product) -> Self {
        Self {
            id: product.uuid.to_string(),
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            sku: product.sku,
            created_at: product.created_at.as_second(),
            updated_at: product.updated_at.as_second(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
    pub sku: String,
}

impl From<CreateProductRequest> for NewProduct {
    fn from(request: CreateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
            category: request.category,
            sku: request.sku,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GetProductRequest {
    pub id: String,
}

/// Zero and empty fields are left untouched by the update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateProductRequest {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub quantity: i32,
    pub category: String,
}

impl From<UpdateProductRequest> for ProductUpdate {
    fn from(request: UpdateProductRequest) -> Self {
        Self {
            name: request.name,
            description: request.description,
            price: request.price,
            quantity: request.quantity,
            category: request.category,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteProductRequest {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListProductsRequest {
    pub page: i32,
    pub limit: i32,
    pub search: String,
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub product: Option<ProductMessage>,
    #[serde(default)]
    pub status: StatusEnvelope,
}

impl RpcMessage for ProductResponse {
    fn from_status(status: StatusEnvelope) -> Self {
        Self {
            product: None,
            status,
        }
    }

    fn status(&self) -> &StatusEnvelope {
        &self.status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListProductsResponse {
    #[serde(default)]
    pub products: Vec<ProductMessage>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub status: StatusEnvelope,
}

impl RpcMessage for ListProductsResponse {
    fn from_status(status: StatusEnvelope) -> Self {
        Self {
            products: Vec::new(),
            total: 0,
            status,
        }
    }

    fn status(&self) -> &StatusEnvelope {
        &self.status
    }
}
