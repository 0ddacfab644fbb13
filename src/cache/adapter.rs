use super::fingerprint::fingerprint;
use super::traits::CacheStore;
use crate::config::CacheConfig;
use crate::diagnostics::health;
use crate::error::CacheError;
use crate::observability::{Observer, ObserverEvent};
use crate::pipeline::{Stage, StageResult};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

const HEALTH_COMPONENT: &str = "cache";

/// How long the adapter stops calling a store that just failed.
const RETRY_AFTER: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CacheStats {
    pub backend: String,
    pub hits: u64,
    pub misses: u64,
    pub writes: u64,
    pub errors: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    writes: AtomicU64,
    errors: AtomicU64,
}

/// Soft-failing front of a [`CacheStore`]. Every operation is bounded by
/// `op_timeout`; store errors, timeouts and undecodable values degrade to a
/// miss (reads) or a no-op (writes).
pub struct CacheAdapter {
    store: Arc<dyn CacheStore>,
    key_prefix: String,
    op_timeout: Duration,
    default_ttl: Duration,
    observer: Arc<dyn Observer>,
    counters: Counters,
    healthy: AtomicBool,
    suspended_until: Mutex<Option<Instant>>,
}

impl CacheAdapter {
    pub fn new(
        store: Arc<dyn CacheStore>,
        config: &CacheConfig,
        observer: Arc<dyn Observer>,
    ) -> Self {
        health::record_ok(HEALTH_COMPONENT);
        Self {
            store,
            key_prefix: config.key_prefix.clone(),
            op_timeout: config.op_timeout(),
            default_ttl: config.default_ttl(),
            observer,
            counters: Counters::default(),
            healthy: AtomicBool::new(true),
            suspended_until: Mutex::new(None),
        }
    }

    pub fn backend(&self) -> &str {
        self.store.name()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn fingerprint(
        &self,
        stage: Stage,
        text: &str,
        options: &BTreeMap<String, String>,
    ) -> String {
        fingerprint(&self.key_prefix, stage, text, options)
    }

    pub async fn get(&self, key: &str) -> Option<StageResult> {
        if self.suspended() {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        let raw = match tokio::time::timeout(self.op_timeout, self.store.get(key)).await {
            Ok(Ok(raw)) => {
                self.mark_ok();
                raw
            }
            Ok(Err(e)) => {
                self.record_failure("get", &e);
                None
            }
            Err(_) => {
                self.record_failure("get", &self.timeout_error());
                None
            }
        };

        let decoded = raw.and_then(|raw| match serde_json::from_str::<StageResult>(&raw) {
            Ok(result) => Some(result),
            Err(e) => {
                tracing::warn!(key, "Discarding undecodable cache entry: {e}");
                self.counters.errors.fetch_add(1, Ordering::Relaxed);
                None
            }
        });

        let counter = if decoded.is_some() {
            &self.counters.hits
        } else {
            &self.counters.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        decoded
    }

    pub async fn set(&self, key: &str, result: &StageResult, ttl: Duration) {
        if self.suspended() {
            return;
        }

        let value = match serde_json::to_string(result) {
            Ok(value) => value,
            Err(e) => {
                self.record_failure("set", &CacheError::Serialization(e.to_string()));
                return;
            }
        };

        match tokio::time::timeout(self.op_timeout, self.store.set(key, value, ttl)).await {
            Ok(Ok(())) => {
                self.mark_ok();
                self.counters.writes.fetch_add(1, Ordering::Relaxed);
            }
            Ok(Err(e)) => self.record_failure("set", &e),
            Err(_) => self.record_failure("set", &self.timeout_error()),
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            backend: self.store.name().to_string(),
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            writes: self.counters.writes.load(Ordering::Relaxed),
            errors: self.counters.errors.load(Ordering::Relaxed),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.healthy.load(Ordering::Relaxed)
    }

    fn timeout_error(&self) -> CacheError {
        CacheError::Timeout {
            after_ms: u64::try_from(self.op_timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn suspended(&self) -> bool {
        let Ok(mut guard) = self.suspended_until.lock() else {
            return false;
        };
        match *guard {
            Some(until) if Instant::now() < until => true,
            Some(_) => {
                *guard = None;
                false
            }
            None => false,
        }
    }

    fn mark_ok(&self) {
        if !self.healthy.swap(true, Ordering::Relaxed) {
            tracing::info!(backend = self.store.name(), "Cache store recovered");
            health::record_ok(HEALTH_COMPONENT);
        }
    }

    fn record_failure(&self, operation: &'static str, error: &CacheError) {
        self.counters.errors.fetch_add(1, Ordering::Relaxed);
        self.healthy.store(false, Ordering::Relaxed);
        if let Ok(mut guard) = self.suspended_until.lock() {
            *guard = Some(Instant::now() + RETRY_AFTER);
        }
        tracing::warn!(
            backend = self.store.name(),
            operation,
            "Cache unavailable, computing without it: {error}"
        );
        health::record_degraded(HEALTH_COMPONENT, error);
        self.observer.record_event(&ObserverEvent::CacheUnavailable {
            operation,
            message: error.to_string(),
        });
    }
}
