use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    /// In-process map, lost on restart.
    #[default]
    Memory,
    /// Shared Redis instance at `url`.
    Redis,
    /// No caching; every stage recomputes.
    None,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default)]
    pub backend: CacheBackend,
    /// Connection string for the redis backend
    #[serde(default = "default_cache_url")]
    pub url: String,
    /// TTL for grammar/detection/plagiarism entries (default: 3600s)
    #[serde(default = "default_ttl_secs")]
    pub default_ttl_secs: u64,
    /// TTL for humanization entries (default: 1800s)
    #[serde(default = "default_humanize_ttl_secs")]
    pub humanize_ttl_secs: u64,
    /// Upper bound on a single get/set round trip (default: 250ms)
    #[serde(default = "default_op_timeout_ms")]
    pub op_timeout_ms: u64,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Entry cap for the memory backend
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

fn default_cache_url() -> String {
    "redis://127.0.0.1:6379".into()
}

fn default_ttl_secs() -> u64 {
    3600
}

fn default_humanize_ttl_secs() -> u64 {
    1800
}

fn default_op_timeout_ms() -> u64 {
    250
}

fn default_key_prefix() -> String {
    "humanizer".into()
}

fn default_max_entries() -> usize {
    10_000
}

impl CacheConfig {
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    pub fn humanize_ttl(&self) -> Duration {
        Duration::from_secs(self.humanize_ttl_secs)
    }

    pub fn op_timeout(&self) -> Duration {
        Duration::from_millis(self.op_timeout_ms)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            url: default_cache_url(),
            default_ttl_secs: default_ttl_secs(),
            humanize_ttl_secs: default_humanize_ttl_secs(),
            op_timeout_ms: default_op_timeout_ms(),
            key_prefix: default_key_prefix(),
            max_entries: default_max_entries(),
        }
    }
}
