//! Products Repository

use async_trait::async_trait;
use mockall::automock;

use crate::{
    domain::{
        products::models::{NewProduct, Product, ProductFilter, ProductUuid},
        store::RepositoryError,
    },
    pagination::PageRequest,
};

mod memory;
mod pg;

pub use memory::MemoryProductsRepository;
pub use pg::PgProductsRepository;

#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Persist a new product, assigning its id and timestamps.
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    async fn get_by_id(&self, product: ProductUuid) -> Result<Option<Product>, RepositoryError>;

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError>;

    /// Write back the mutable fields and bump `updated_at`.
    async fn update(&self, product: Product) -> Result<Product, RepositoryError>;

    async fn delete(&self, product: ProductUuid) -> Result<(), RepositoryError>;

    /// Newest first, with the unpaged match count.
    async fn list(
        &self,
        page: PageRequest,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, u64), RepositoryError>;
}
