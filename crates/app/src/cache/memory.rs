//! In-process cache adapter.

use std::{
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Serialize, de::DeserializeOwned};
use tokio::time::Instant;

use crate::{
    cache::{Cache, CacheError, pattern},
    pagination::Page,
};

/// Writes between full sweeps of expired entries.
const SWEEP_INTERVAL: usize = 256;

#[derive(Debug, Clone)]
struct Entry {
    bytes: Vec<u8>,

    /// `None` when the TTL reaches past what the clock can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|deadline| now < deadline)
    }
}

/// Cache backed by a concurrent map. Entries carry their own deadline.
/// Expired entries are dropped when read, and swept from the whole map
/// every [`SWEEP_INTERVAL`] writes and on pattern invalidation.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<String, Entry>>,
    writes: Arc<AtomicUsize>,
}

impl MemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entry count.
    pub fn len(&self) -> usize {
        let now = Instant::now();

        self.entries.iter().filter(|entry| entry.is_live(now)).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let now = Instant::now();

        self.entries.retain(|_, entry| entry.is_live(now));
    }

    fn store<V: Serialize>(&self, key: &str, value: &V, ttl: Duration) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(value)?;

        if self.writes.fetch_add(1, Ordering::Relaxed) % SWEEP_INTERVAL == SWEEP_INTERVAL - 1 {
            self.purge_expired();
        }

        self.entries.insert(
            key.to_string(),
            Entry {
                bytes,
                expires_at: Instant::now().checked_add(ttl),
            },
        );

        Ok(())
    }

    fn load<V: DeserializeOwned>(&self, key: &str) -> Result<Option<V>, CacheError> {
        let now = Instant::now();

        let live = self
            .entries
            .get(key)
            .map(|entry| entry.is_live(now).then(|| entry.bytes.clone()));

        match live {
            Some(Some(bytes)) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Some(None) => {
                self.entries.remove_if(key, |_, entry| !entry.is_live(now));
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

#[async_trait]
impl<T> Cache<T> for MemoryCache
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    async fn set(&self, key: &str, value: &T, ttl: Duration) -> Result<(), CacheError> {
        self.store(key, value, ttl)
    }

    async fn get(&self, key: &str) -> Result<Option<T>, CacheError> {
        self.load(key)
    }

    async fn delete(&self, key: &str) -> Result<(), CacheError> {
        self.entries.remove(key);

        Ok(())
    }

    async fn set_list(&self, key: &str, page: &Page<T>, ttl: Duration) -> Result<(), CacheError> {
        self.store(key, page, ttl)
    }

    async fn get_list(&self, key: &str) -> Result<Option<Page<T>>, CacheError> {
        self.load(key)
    }

    async fn invalidate_pattern(&self, pattern: &str) -> Result<(), CacheError> {
        let now = Instant::now();

        self.entries
            .retain(|key, entry| entry.is_live(now) && !pattern::matches(pattern, key));

        Ok(())
    }
}
