use std::{cmp::Reverse, collections::HashMap, sync::Arc};

use async_trait::async_trait;
use jiff::Timestamp;
use parking_lot::RwLock;

use crate::{
    domain::{
        products::{
            models::{NewProduct, Product, ProductFilter, ProductUuid},
            repository::ProductsRepository,
        },
        store::{RepositoryError, contains_ignore_case, next_timestamp},
    },
    pagination::PageRequest,
};

/// Products held in a process-local map. SKUs are unique, mirroring the
/// Postgres index.
#[derive(Debug, Clone, Default)]
pub struct MemoryProductsRepository {
    rows: Arc<RwLock<HashMap<ProductUuid, Product>>>,
}

impl MemoryProductsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductFilter {
    fn matches(&self, product: &Product) -> bool {
        let search = self.search.is_empty()
            || contains_ignore_case(&product.name, &self.search)
            || contains_ignore_case(&product.description, &self.search)
            || contains_ignore_case(&product.sku, &self.search);

        let category =
            self.category.is_empty() || contains_ignore_case(&product.category, &self.category);

        search && category
    }
}

#[async_trait]
impl ProductsRepository for MemoryProductsRepository {
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.write();

        if rows.values().any(|existing| existing.sku == product.sku) {
            return Err(RepositoryError::AlreadyExists("sku"));
        }

        let now = Timestamp::now();
        let created = Product {
            uuid: ProductUuid::new(),
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            sku: product.sku,
            created_at: now,
            updated_at: now,
        };

        rows.insert(created.uuid, created.clone());

        Ok(created)
    }

    async fn get_by_id(&self, product: ProductUuid) -> Result<Option<Product>, RepositoryError> {
        Ok(self.rows.read().get(&product).cloned())
    }

    async fn get_by_sku(&self, sku: &str) -> Result<Option<Product>, RepositoryError> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|product| product.sku == sku)
            .cloned())
    }

    async fn update(&self, product: Product) -> Result<Product, RepositoryError> {
        let mut rows = self.rows.write();

        let stored = rows
            .get_mut(&product.uuid)
            .ok_or(RepositoryError::NotFound)?;

        stored.name = product.name;
        stored.description = product.description;
        stored.price = product.price;
        stored.quantity = product.quantity;
        stored.category = product.category;
        stored.updated_at = next_timestamp(stored.updated_at);

        Ok(stored.clone())
    }

    async fn delete(&self, product: ProductUuid) -> Result<(), RepositoryError> {
        self.rows
            .write()
            .remove(&product)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    async fn list(
        &self,
        page: PageRequest,
        filter: &ProductFilter,
    ) -> Result<(Vec<Product>, u64), RepositoryError> {
        let mut matching: Vec<Product> = self
            .rows
            .read()
            .values()
            .filter(|product| filter.matches(product))
            .cloned()
            .collect();

        matching.sort_by_key(|product| Reverse((product.created_at, product.uuid)));

        let total = matching.len() as u64;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        Ok((matching.into_iter().skip(skip).take(take).collect(), total))
    }
}
