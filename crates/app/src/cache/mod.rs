//! Key/value cache fronting the repositories.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

use crate::pagination::Page;

pub mod keys;
pub mod memory;
mod pattern;
pub mod redis;

pub use memory::MemoryCache;
pub use redis::{RedisCache, RedisSettings};

/// Default lifetime of a cached entity.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache pool could not be created: {0}")]
    CreatePool(#[from] deadpool_redis::CreatePoolError),

    #[error("cache connection failed: {0}")]
    Pool(#[from] deadpool_redis::PoolError),

    #[error("cache command failed: {0}")]
    Command(#[from] deadpool_redis::redis::RedisError),

    #[error("cache value could not be encoded: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// How long cached values live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub ttl: Duration,

    /// Lifetime of cached list pages. `None` disables list caching.
    pub list_ttl: Option<Duration>,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            list_ttl: None,
        }
    }
}

/// Values are stored serialized, so adapters only need to move bytes.
#[async_trait]
pub trait Cache<T>: Send + Sync
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError>;

    /// `Ok(None)` on a miss or an expired entry.
    async fn get(&self, key: &str) -> Result<Option<T>, CacheError>;

    async fn delete(&self, key: &str) -> Result<(), CacheError>;

    async fn set_list(&self, key: &str, page: &Page<T>, ttl: Duration) -> Result<(), CacheError>;

    async fn get_list(&self, key: &str) -> Result<Option<Page<T>>, CacheError>;

    /// Remove every key matching a glob pattern (`*` and `?`).
    async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError>;
}
