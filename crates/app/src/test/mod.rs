//! Shared test fixtures.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    cache::{Cache, CacheError},
    pagination::Page,
};

mod db;

pub use db::TestDb;

/// A cache whose every operation fails, for checking that cache trouble
/// never leaks into service results.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingCache;

fn unavailable() -> CacheError {
    CacheError::Serialization(serde::de::Error::custom("cache unavailable"))
}

#[async_trait]
impl<T> Cache<T> for FailingCache
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn set(&self, _key: &str, _value: &T, _ttl: Duration) -> Result<(), CacheError> {
        Err(unavailable())
    }

    async fn get(&self, _key: &str) -> Result<Option<T>, CacheError> {
        Err(unavailable())
    }

    async fn delete(&self, _key: &str) -> Result<(), CacheError> {
        Err(unavailable())
    }

    async fn set_list(&self, _key: &str, _page: &Page<T>, _ttl: Duration) -> Result<(), CacheError> {
        Err(unavailable())
    }

    async fn get_list(&self, _key: &str) -> Result<Option<Page<T>>, CacheError> {
        Err(unavailable())
    }

    async fn invalidate_pattern(&self, _pattern: &str) -> Result<(), CacheError> {
        Err(unavailable())
    }
}
