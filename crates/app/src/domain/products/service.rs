//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::{debug, warn};

use crate::{
    cache::{Cache, CachePolicy, keys},
    domain::{
        products::{
            errors::ProductsServiceError,
            models::{NewProduct, Product, ProductQuery, ProductUpdate, ProductUuid},
            repository::ProductsRepository,
        },
        store::RepositoryError,
    },
    pagination::{Page, PageRequest},
};

/// Cache-aside products service: the repository is the source of truth and
/// cache failures are logged, never surfaced.
#[derive(Clone)]
pub struct CachedProductsService {
    repository: Arc<dyn ProductsRepository>,
    cache: Arc<dyn Cache<Product>>,
    policy: CachePolicy,
}

impl std::fmt::Debug for CachedProductsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedProductsService")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl CachedProductsService {
    #[must_use]
    pub fn new(
        repository: Arc<dyn ProductsRepository>,
        cache: Arc<dyn Cache<Product>>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            repository,
            cache,
            policy,
        }
    }

    async fn remember(&self, product: &Product) {
        let key = keys::entity(keys::PRODUCT_PREFIX, product.uuid);

        if let Err(error) = self.cache.set(&key, product, self.policy.ttl).await {
            warn!(%key, %error, "failed to cache product");
        }
    }

    async fn forget(&self, product: ProductUuid) {
        let key = keys::entity(keys::PRODUCT_PREFIX, product);

        if let Err(error) = self.cache.delete(&key).await {
            warn!(%key, %error, "failed to evict product from cache");
        }
    }

    async fn invalidate_lists(&self) {
        if self.policy.list_ttl.is_none() {
            return;
        }

        let pattern = keys::list_pattern(keys::PRODUCT_PREFIX);

        if let Err(error) = self.cache.invalidate_pattern(&pattern).await {
            warn!(%pattern, %error, "failed to invalidate cached product lists");
        }
    }
}

#[async_trait]
impl ProductsService for CachedProductsService {
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let existing = self
            .repository
            .get_by_sku(&product.sku)
            .await
            .map_err(ProductsServiceError::repository("check"))?;

        if existing.is_some() {
            return Err(ProductsServiceError::AlreadyExists(product.sku));
        }

        let sku = product.sku.clone();

        let created = self
            .repository
            .create(product)
            .await
            .map_err(|error| match error {
                RepositoryError::AlreadyExists(_) => ProductsServiceError::AlreadyExists(sku),
                error => ProductsServiceError::repository("create")(error),
            })?;

        self.remember(&created).await;
        self.invalidate_lists().await;

        Ok(created)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError> {
        let key = keys::entity(keys::PRODUCT_PREFIX, product);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => {
                debug!(%key, "product cache hit");
                return Ok(cached);
            }
            Ok(None) => debug!(%key, "product cache miss"),
            Err(error) => warn!(%key, %error, "product cache read failed"),
        }

        let found = self
            .repository
            .get_by_id(product)
            .await
            .map_err(ProductsServiceError::repository("get"))?
            .ok_or(ProductsServiceError::NotFound)?;

        self.remember(&found).await;

        Ok(found)
    }

    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let mut current = self.get_product(product).await?;

        update.apply(&mut current);

        let updated = self
            .repository
            .update(current)
            .await
            .map_err(ProductsServiceError::repository("update"))?;

        self.remember(&updated).await;
        self.invalidate_lists().await;

        Ok(updated)
    }

    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError> {
        self.repository
            .delete(product)
            .await
            .map_err(ProductsServiceError::repository("delete"))?;

        self.forget(product).await;
        self.invalidate_lists().await;

        Ok(())
    }

    async fn list_products(
        &self,
        query: ProductQuery,
    ) -> Result<Page<Product>, ProductsServiceError> {
        let request = PageRequest::clamped(query.page, query.limit);
        let filter = query.filter;

        let key = keys::list(
            keys::PRODUCT_PREFIX,
            request,
            &[filter.search.as_str(), filter.category.as_str()],
        );

        if self.policy.list_ttl.is_some() {
            match self.cache.get_list(&key).await {
                Ok(Some(page)) => return Ok(page),
                Ok(None) => {}
                Err(error) => warn!(%key, %error, "product list cache read failed"),
            }
        }

        let (products, total) = self
            .repository
            .list(request, &filter)
            .await
            .map_err(ProductsServiceError::repository("list"))?;

        let page = Page::new(products, total, request);

        if let Some(ttl) = self.policy.list_ttl
            && let Err(error) = self.cache.set_list(&key, &page, ttl).await
        {
            warn!(%key, %error, "failed to cache product list");
        }

        Ok(page)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Create a product. Fails with `AlreadyExists` when the SKU is taken.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Retrieve a single product, from cache when possible.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, ProductsServiceError>;

    /// Merge the populated fields of `update` into the stored product.
    async fn update_product(
        &self,
        product: ProductUuid,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Delete a product.
    async fn delete_product(&self, product: ProductUuid) -> Result<(), ProductsServiceError>;

    /// List products newest first.
    async fn list_products(&self, query: ProductQuery)
    -> Result<Page<Product>, ProductsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jiff::Timestamp;
    use testresult::TestResult;

    use super::*;
    use crate::{
        cache::{CacheError, MemoryCache},
        domain::products::{
            models::ProductFilter,
            repository::{MemoryProductsRepository, MockProductsRepository},
        },
        test::FailingCache,
    };

    fn hammer() -> NewProduct {
        NewProduct {
            name: "Hammer".to_string(),
            description: "Claw hammer".to_string(),
            price: 12.5,
            quantity: 4,
            category: "tools".to_string(),
            sku: "HAM-1".to_string(),
        }
    }

    fn stored(product: NewProduct) -> Product {
        let now = Timestamp::now();

        Product {
            uuid: ProductUuid::new(),
            name: product.name,
            description: product.description,
            price: product.price,
            quantity: product.quantity,
            category: product.category,
            sku: product.sku,
            created_at: now,
            updated_at: now,
        }
    }

    fn service_with(
        repository: impl ProductsRepository + 'static,
        cache: Arc<MemoryCache>,
        policy: CachePolicy,
    ) -> CachedProductsService {
        CachedProductsService::new(Arc::new(repository), cache, policy)
    }

    async fn cached(cache: &MemoryCache, product: ProductUuid) -> Result<Option<Product>, CacheError> {
        <MemoryCache as Cache<Product>>::get(cache, &keys::entity(keys::PRODUCT_PREFIX, product))
            .await
    }

    #[tokio::test]
    async fn create_populates_the_cache() -> TestResult {
        let cache = Arc::new(MemoryCache::new());
        let service = service_with(
            MemoryProductsRepository::new(),
            cache.clone(),
            CachePolicy::default(),
        );

        let created = service.create_product(hammer()).await?;

        assert_eq!(cached(&cache, created.uuid).await?, Some(created));

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_sku_is_rejected_without_a_write() -> TestResult {
        let existing = stored(hammer());
        let mut repository = MockProductsRepository::new();

        repository
            .expect_get_by_sku()
            .once()
            .withf(|sku| sku == "HAM-1")
            .return_once(move |_| Ok(Some(existing)));

        repository.expect_create().never();

        let service = service_with(
            repository,
            Arc::new(MemoryCache::new()),
            CachePolicy::default(),
        );

        let result = service.create_product(hammer()).await;

        assert!(
            matches!(&result, Err(ProductsServiceError::AlreadyExists(sku)) if sku == "HAM-1"),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unique_index_violation_is_also_a_conflict() -> TestResult {
        let mut repository = MockProductsRepository::new();

        repository
            .expect_get_by_sku()
            .once()
            .return_once(|_| Ok(None));

        repository
            .expect_create()
            .once()
            .return_once(|_| Err(RepositoryError::AlreadyExists("sku")));

        let service = service_with(
            repository,
            Arc::new(MemoryCache::new()),
            CachePolicy::default(),
        );

        let result = service.create_product(hammer()).await;

        assert!(matches!(result, Err(ProductsServiceError::AlreadyExists(_))));

        Ok(())
    }

    #[tokio::test]
    async fn second_read_is_served_from_cache() -> TestResult {
        let product = stored(hammer());
        let uuid = product.uuid;
        let mut repository = MockProductsRepository::new();

        repository
            .expect_get_by_id()
            .once()
            .withf(move |id| *id == uuid)
            .return_once(move |_| Ok(Some(product)));

        let service = service_with(
            repository,
            Arc::new(MemoryCache::new()),
            CachePolicy::default(),
        );

        let first = service.get_product(uuid).await?;
        let second = service.get_product(uuid).await?;

        assert_eq!(first, second);

        Ok(())
    }

    #[tokio::test]
    async fn not_found_is_not_cached() -> TestResult {
        let cache = Arc::new(MemoryCache::new());
        let service = service_with(
            MemoryProductsRepository::new(),
            cache.clone(),
            CachePolicy::default(),
        );

        let result = service.get_product(ProductUuid::new()).await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));
        assert!(cache.is_empty(), "nothing should be cached on a miss");

        Ok(())
    }

    #[tokio::test]
    async fn expired_entries_fall_through_to_the_repository() -> TestResult {
        let cache = Arc::new(MemoryCache::new());
        let service = service_with(
            MemoryProductsRepository::new(),
            cache.clone(),
            CachePolicy {
                ttl: Duration::ZERO,
                list_ttl: None,
            },
        );

        let created = service.create_product(hammer()).await?;

        assert_eq!(cached(&cache, created.uuid).await?, None);
        assert_eq!(service.get_product(created.uuid).await?, created);

        Ok(())
    }

    #[tokio::test]
    async fn partial_update_keeps_unset_fields() -> TestResult {
        let cache = Arc::new(MemoryCache::new());
        let service = service_with(
            MemoryProductsRepository::new(),
            cache.clone(),
            CachePolicy::default(),
        );

        let created = service.create_product(hammer()).await?;

        let updated = service
            .update_product(
                created.uuid,
                ProductUpdate {
                    quantity: 9,
                    ..ProductUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.quantity, 9);
        assert_eq!(updated.name, created.name);
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.category, created.category);
        assert_eq!(updated.sku, created.sku);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(cached(&cache, created.uuid).await?, Some(updated));

        Ok(())
    }

    #[tokio::test]
    async fn update_of_a_missing_product_is_not_found() -> TestResult {
        let service = service_with(
            MemoryProductsRepository::new(),
            Arc::new(MemoryCache::new()),
            CachePolicy::default(),
        );

        let result = service
            .update_product(ProductUuid::new(), ProductUpdate::default())
            .await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn delete_removes_both_tiers() -> TestResult {
        let cache = Arc::new(MemoryCache::new());
        let service = service_with(
            MemoryProductsRepository::new(),
            cache.clone(),
            CachePolicy::default(),
        );

        let created = service.create_product(hammer()).await?;
        service.delete_product(created.uuid).await?;

        assert_eq!(cached(&cache, created.uuid).await?, None);
        assert!(matches!(
            service.get_product(created.uuid).await,
            Err(ProductsServiceError::NotFound)
        ));

        Ok(())
    }

    #[tokio::test]
    async fn delete_of_a_missing_product_is_not_found() -> TestResult {
        let service = service_with(
            MemoryProductsRepository::new(),
            Arc::new(MemoryCache::new()),
            CachePolicy::default(),
        );

        let result = service.delete_product(ProductUuid::new()).await;

        assert!(matches!(result, Err(ProductsServiceError::NotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn cache_failures_do_not_change_results() -> TestResult {
        let service = CachedProductsService::new(
            Arc::new(MemoryProductsRepository::new()),
            Arc::new(FailingCache),
            CachePolicy {
                ttl: Duration::from_secs(60),
                list_ttl: Some(Duration::from_secs(60)),
            },
        );

        let created = service.create_product(hammer()).await?;
        let fetched = service.get_product(created.uuid).await?;
        let updated = service
            .update_product(
                created.uuid,
                ProductUpdate {
                    name: "Mallet".to_string(),
                    ..ProductUpdate::default()
                },
            )
            .await?;
        let page = service.list_products(ProductQuery::default()).await?;
        service.delete_product(created.uuid).await?;

        assert_eq!(fetched, created);
        assert_eq!(updated.name, "Mallet");
        assert_eq!(page.total, 1);

        Ok(())
    }

    #[tokio::test]
    async fn list_clamps_the_page_window() -> TestResult {
        let mut repository = MockProductsRepository::new();

        repository
            .expect_list()
            .once()
            .withf(|page, _| page.page() == 1 && page.limit() == 10)
            .return_once(|_, _| Ok((Vec::new(), 0)));

        let service = service_with(
            repository,
            Arc::new(MemoryCache::new()),
            CachePolicy::default(),
        );

        let page = service
            .list_products(ProductQuery {
                page: 0,
                limit: -5,
                filter: ProductFilter::default(),
            })
            .await?;

        assert_eq!((page.page, page.limit, page.total), (1, 10, 0));

        Ok(())
    }

    #[tokio::test]
    async fn cached_lists_are_invalidated_by_writes() -> TestResult {
        let service = service_with(
            MemoryProductsRepository::new(),
            Arc::new(MemoryCache::new()),
            CachePolicy {
                ttl: Duration::from_secs(60),
                list_ttl: Some(Duration::from_secs(60)),
            },
        );

        assert_eq!(service.list_products(ProductQuery::default()).await?.total, 0);

        service.create_product(hammer()).await?;

        assert_eq!(service.list_products(ProductQuery::default()).await?.total, 1);

        Ok(())
    }

    #[tokio::test]
    async fn cached_lists_keep_filters_apart() -> TestResult {
        let service = service_with(
            MemoryProductsRepository::new(),
            Arc::new(MemoryCache::new()),
            CachePolicy {
                ttl: Duration::from_secs(60),
                list_ttl: Some(Duration::from_secs(60)),
            },
        );

        service
            .create_product(NewProduct {
                name: "a:b".to_string(),
                category: "c".to_string(),
                ..hammer()
            })
            .await?;

        let query = |search: &str, category: &str| ProductQuery {
            filter: ProductFilter {
                search: search.to_string(),
                category: category.to_string(),
            },
            ..ProductQuery::default()
        };

        assert_eq!(service.list_products(query("a:b", "c")).await?.total, 1);
        assert_eq!(service.list_products(query("a", "b:c")).await?.total, 0);

        Ok(())
    }
}
