//! Cache Config

use std::time::Duration;

use clap::Args;

use mesh_app::{
    cache::{CachePolicy, RedisSettings},
    context::CacheSettings,
};

/// Cache backend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum CacheKind {
    Redis,
    Memory,
}

/// Cache settings.
#[derive(Debug, Args)]
pub struct CacheConfig {
    /// Cache backend (redis, memory)
    #[arg(long, env = "CACHE", value_enum, default_value_t = CacheKind::Redis)]
    pub cache: CacheKind,

    /// Redis address as host:port
    #[arg(long, env = "REDIS_ADDR", default_value = "127.0.0.1:6379")]
    pub redis_addr: String,

    /// Redis password
    #[arg(long, env = "REDIS_PASSWORD")]
    pub redis_password: Option<String>,

    /// Redis logical database index
    #[arg(long, env = "REDIS_DB", default_value_t = 0)]
    pub redis_db: u32,

    /// Lifetime of cached entities, in seconds
    #[arg(long, env = "CACHE_TTL_SECONDS", default_value_t = 3600)]
    pub cache_ttl_seconds: u64,

    /// Lifetime of cached list pages, in seconds. Unset disables list caching.
    #[arg(long, env = "LIST_CACHE_TTL_SECONDS")]
    pub list_cache_ttl_seconds: Option<u64>,
}

impl CacheConfig {
    #[must_use]
    pub fn settings(&self) -> CacheSettings {
        match self.cache {
            CacheKind::Memory => CacheSettings::Memory,
            CacheKind::Redis => CacheSettings::Redis(RedisSettings {
                addr: self.redis_addr.clone(),
                password: self.redis_password.clone().filter(|password| !password.is_empty()),
                db: self.redis_db,
            }),
        }
    }

    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        CachePolicy {
            ttl: Duration::from_secs(self.cache_ttl_seconds),
            list_ttl: self.list_cache_ttl_seconds.map(Duration::from_secs),
        }
    }
}
