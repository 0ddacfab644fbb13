use super::traits::{CacheFuture, CacheStore};
use crate::error::CacheError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

const MAX_TTL: Duration = Duration::from_secs(10 * 365 * 24 * 60 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub key: String,
    pub value: String,
    pub expires_at: DateTime<Utc>,
}

impl CacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// In-process store. Expired entries are dropped lazily on read and swept
/// when the map reaches `max_entries`.
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
    max_entries: usize,
}

impl MemoryCacheStore {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map_or(0, |map| map.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, key: &str) -> Result<Option<String>, CacheError> {
        let now = Utc::now();
        {
            let map = self
                .entries
                .read()
                .map_err(|_| CacheError::Unavailable("memory cache lock poisoned".into()))?;
            match map.get(key) {
                Some(entry) if !entry.is_expired(now) => return Ok(Some(entry.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        let mut map = self
            .entries
            .write()
            .map_err(|_| CacheError::Unavailable("memory cache lock poisoned".into()))?;
        if map.get(key).is_some_and(|entry| entry.is_expired(now)) {
            map.remove(key);
        }
        Ok(None)
    }

    fn insert(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        let now = Utc::now();
        let ttl = chrono::Duration::from_std(ttl.min(MAX_TTL)).unwrap_or_default();
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        let mut map = self
            .entries
            .write()
            .map_err(|_| CacheError::Unavailable("memory cache lock poisoned".into()))?;

        if map.len() >= self.max_entries && !map.contains_key(key) {
            map.retain(|_, entry| !entry.is_expired(now));
            if map.len() >= self.max_entries {
                let oldest = map
                    .values()
                    .min_by_key(|entry| entry.expires_at)
                    .map(|entry| entry.key.clone());
                if let Some(oldest) = oldest {
                    map.remove(&oldest);
                }
            }
        }

        map.insert(
            key.to_string(),
            CacheEntry {
                key: key.to_string(),
                value,
                expires_at,
            },
        );
        Ok(())
    }
}

impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
        Box::pin(async move { self.lookup(key) })
    }

    fn set<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> CacheFuture<'a, ()> {
        Box::pin(async move { self.insert(key, value, ttl) })
    }
}
