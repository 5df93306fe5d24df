//! Redis cache adapter.

use std::time::Duration;

use async_trait::async_trait;
use deadpool_redis::{
    Config, Pool, Runtime,
    redis::{AsyncCommands, cmd},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, info};

use crate::{
    cache::{Cache, CacheError},
    pagination::Page,
};

const SCAN_BATCH: usize = 250;

/// Where to find Redis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedisSettings {
    /// `host:port`
    pub addr: String,
    pub password: Option<String>,
    pub db: u32,
}

impl RedisSettings {
    fn url(&self) -> String {
        match self.password.as_deref().filter(|password| !password.is_empty()) {
            Some(password) => format!("redis://:{password}@{}/{}", self.addr, self.db),
            None => format!("redis://{}/{}", self.addr, self.db),
        }
    }
}

/// Cache stored in Redis with native key expiry.
#[derive(Clone)]
pub struct RedisCache {
    pool: Pool,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache")
            .field("status", &self.pool.status())
            .finish()
    }
}

impl RedisCache {
    /// Build a pool and check that one connection can be opened.
    ///
    /// # Errors
    ///
    /// Returns an error when the pool cannot be created or Redis is unreachable.
    pub async fn connect(settings: &RedisSettings) -> Result<Self, CacheError> {
        let pool = Config::from_url(settings.url()).create_pool(Some(Runtime::Tokio1))?;

        drop(pool.get().await?);

        info!(addr = %settings.addr, db = settings.db, "connected to redis");

        Ok(Self { pool })
    }

    #[must_use]
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    async fn write<V: Serialize + Sync>(
        &self,
        key: &str,
        value: &V,
        ttl: Duration,
    ) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await?;

        // SETEX rejects a zero expiry; an entry that expires immediately is an absent one.
        if ttl.as_secs() == 0 {
            conn.del::<_, ()>(key).await?;
            return Ok(());
        }

        let bytes = serde_json::to_vec(value)?;

        conn.set_ex::<_, _, ()>(key, bytes, ttl.as_secs()).await?;

        Ok(())
    }

    async fn read<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, CacheError> {
        let mut conn = self.pool.get().await?;

        let bytes = conn.get::<_, Option<Vec<u8>>>(key).await?;

        Ok(bytes
            .map(|bytes| serde_json::from_slice(&bytes))
            .transpose()?)
    }
}

#[async_trait]
impl<T> Cache<T> for RedisCache
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError> {
        self.write(key, value, ttl).await
    }

    async fn get(&self, key: &str) -> Result<Option<T>, CacheError> {
        self.read(key).await
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await?;

        conn.del::<_, ()>(key).await?;

        Ok(())
    }

    async fn set_list(&self, key: &str, page: &Page<T>, ttl: Duration) -> Result<(), CacheError> {
        self.write(key, page, ttl).await
    }

    async fn get_list(&self, key: &str) -> Result<Option<Page<T>>, CacheError> {
        self.read(key).await
    }

    async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let mut conn = self.pool.get().await?;
        let mut cursor: u64 = 0;
        let mut removed = 0usize;

        loop {
            let (next, keys): (u64, Vec<String>) = cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH)
                .query_async(&mut conn)
                .await?;

            if !keys.is_empty() {
                removed += keys.len();
                conn.del::<_, ()>(keys).await?;
            }

            if next == 0 {
                break;
            }

            cursor = next;
        }

        debug!(pattern, removed, "invalidated cache keys");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use testcontainers::runners::AsyncRunner;
    use testcontainers_modules::redis::Redis;
    use testresult::TestResult;

    use super::*;
    use crate::pagination::PageRequest;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Widget {
        name: String,
    }

    #[test]
    fn url_includes_password_only_when_set() {
        let mut settings = RedisSettings {
            addr: "cache:6379".to_string(),
            password: None,
            db: 2,
        };

        assert_eq!(settings.url(), "redis://cache:6379/2");

        settings.password = Some(String::new());
        assert_eq!(settings.url(), "redis://cache:6379/2");

        settings.password = Some("hunter2".to_string());
        assert_eq!(settings.url(), "redis://:hunter2@cache:6379/2");
    }

    #[tokio::test]
    async fn round_trips_and_invalidates_against_a_real_server() -> TestResult {
        let container = Redis::default().start().await?;
        let port = container.get_host_port_ipv4(6379).await?;
        let cache = RedisCache::connect(&RedisSettings {
            addr: format!("127.0.0.1:{port}"),
            password: None,
            db: 0,
        })
        .await?;

        let widget = Widget {
            name: "a".to_string(),
        };
        let page = Page::new(vec![widget.clone()], 1, PageRequest::default());

        cache.set("widget:1", &widget, Duration::from_secs(60)).await?;
        cache.set_list("widget:list:1:10:", &page, Duration::from_secs(60)).await?;

        assert_eq!(
            <RedisCache as Cache<Widget>>::get(&cache, "widget:1").await?,
            Some(widget.clone())
        );

        <RedisCache as Cache<Widget>>::invalidate_pattern(&cache, "widget:list:*").await?;

        assert_eq!(
            <RedisCache as Cache<Widget>>::get_list(&cache, "widget:list:1:10:").await?,
            None
        );
        assert_eq!(
            <RedisCache as Cache<Widget>>::get(&cache, "widget:1").await?,
            Some(widget)
        );

        Ok(())
    }
}
