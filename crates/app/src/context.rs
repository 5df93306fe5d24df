//! App Context

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tracing::info;

use crate::{
    cache::{Cache, CacheError, CachePolicy, MemoryCache, RedisCache, RedisSettings},
    database,
    domain::{
        products::{
            CachedProductsService, ProductsService,
            models::Product,
            repository::{MemoryProductsRepository, PgProductsRepository, ProductsRepository},
        },
        users::{
            CachedUsersService, UsersService,
            models::User,
            repository::{MemoryUsersRepository, PgUsersRepository, UsersRepository},
        },
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply database migrations")]
    Migrate(#[source] sqlx::migrate::MigrateError),

    #[error("failed to connect to cache")]
    Cache(#[source] CacheError),
}

/// Where repositories keep their records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreSettings {
    Postgres { url: String, timeout: Duration },
    Memory,
}

/// Which cache fronts the repositories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheSettings {
    Redis(RedisSettings),
    Memory,
}

#[derive(Clone)]
pub struct AppContext {
    pub users: Arc<dyn UsersService>,
    pub products: Arc<dyn ProductsService>,
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext").finish_non_exhaustive()
    }
}

impl AppContext {
    /// Connect the configured store and cache and build both services.
    ///
    /// # Errors
    ///
    /// Returns an error when the database or cache cannot be reached, or
    /// migrations fail.
    pub async fn connect(
        store: &StoreSettings,
        cache: &CacheSettings,
        policy: CachePolicy,
    ) -> Result<Self, AppInitError> {
        let (users_repository, products_repository): (
            Arc<dyn UsersRepository>,
            Arc<dyn ProductsRepository>,
        ) = match store {
            StoreSettings::Postgres { url, timeout } => {
                let pool = database::connect(url, *timeout)
                    .await
                    .map_err(AppInitError::Database)?;

                database::migrate(&pool)
                    .await
                    .map_err(AppInitError::Migrate)?;

                info!("using postgres store");

                (
                    Arc::new(PgUsersRepository::new(pool.clone())),
                    Arc::new(PgProductsRepository::new(pool)),
                )
            }
            StoreSettings::Memory => {
                info!("using in-memory store");

                (
                    Arc::new(MemoryUsersRepository::new()),
                    Arc::new(MemoryProductsRepository::new()),
                )
            }
        };

        let (users_cache, products_cache): (Arc<dyn Cache<User>>, Arc<dyn Cache<Product>>) =
            match cache {
                CacheSettings::Redis(settings) => {
                    let redis = RedisCache::connect(settings)
                        .await
                        .map_err(AppInitError::Cache)?;

                    (Arc::new(redis.clone()), Arc::new(redis))
                }
                CacheSettings::Memory => {
                    info!("using in-memory cache");

                    let memory = MemoryCache::new();

                    (Arc::new(memory.clone()), Arc::new(memory))
                }
            };

        Ok(Self {
            users: Arc::new(CachedUsersService::new(
                users_repository,
                users_cache,
                policy,
            )),
            products: Arc::new(CachedProductsService::new(
                products_repository,
                products_cache,
                policy,
            )),
        })
    }

    /// Both services over in-memory adapters.
    #[must_use]
    pub fn in_memory(policy: CachePolicy) -> Self {
        let cache = MemoryCache::new();

        Self {
            users: Arc::new(CachedUsersService::new(
                Arc::new(MemoryUsersRepository::new()),
                Arc::new(cache.clone()),
                policy,
            )),
            products: Arc::new(CachedProductsService::new(
                Arc::new(MemoryProductsRepository::new()),
                Arc::new(cache),
                policy,
            )),
        }
    }
}
