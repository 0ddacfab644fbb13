use crate::error::CacheError;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub type CacheFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CacheError>> + Send + 'a>>;

/// External key-value store with per-key expiry. Values are opaque strings;
/// expiry is the store's job.
pub trait CacheStore: Send + Sync {
    /// Backend identifier (e.g. "memory", "redis").
    fn name(&self) -> &str;

    fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>>;

    fn set<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> CacheFuture<'a, ()>;
}

/// Always-compute mode: reads miss, writes are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledCacheStore;

impl CacheStore for DisabledCacheStore {
    fn name(&self) -> &str {
        "none"
    }

    fn get<'a>(&'a self, _key: &'a str) -> CacheFuture<'a, Option<String>> {
        Box::pin(async { Ok(None) })
    }

    fn set<'a>(&'a self, _key: &'a str, _value: String, _ttl: Duration) -> CacheFuture<'a, ()> {
        Box::pin(async { Ok(()) })
    }
}
