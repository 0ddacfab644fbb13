//! Stage-result cache: a narrow get/set/TTL store behind an adapter that
//! never lets a store failure reach the pipeline.

mod adapter;
mod fingerprint;
mod memory;
mod redis_store;
mod traits;

pub use adapter::{CacheAdapter, CacheStats};
pub use fingerprint::fingerprint;
pub use memory::{CacheEntry, MemoryCacheStore};
pub use redis_store::RedisCacheStore;
pub use traits::{CacheStore, DisabledCacheStore};

use crate::config::{CacheBackend, CacheConfig};
use std::sync::Arc;

/// Factory: build the configured store. A redis URL that does not parse
/// leaves the service in always-compute mode rather than failing startup.
pub fn create_store(config: &CacheConfig) -> Arc<dyn CacheStore> {
    match config.backend {
        CacheBackend::Memory => Arc::new(MemoryCacheStore::new(config.max_entries)),
        CacheBackend::Redis => match RedisCacheStore::new(&config.url) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                tracing::warn!("Redis cache disabled: {e}");
                Arc::new(DisabledCacheStore)
            }
        },
        CacheBackend::None => Arc::new(DisabledCacheStore),
    }
}
