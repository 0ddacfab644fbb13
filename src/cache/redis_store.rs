use super::traits::{CacheFuture, CacheStore};
use crate::error::CacheError;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Redis-backed store. The connection is opened on first use; a failed
/// connect leaves the cell empty so the next call tries again.
pub struct RedisCacheStore {
    client: redis::Client,
    connection: OnceCell<ConnectionManager>,
}

impl RedisCacheStore {
    pub fn new(url: &str) -> Result<Self, CacheError> {
        let client = redis::Client::open(url)
            .map_err(|e| CacheError::Unavailable(format!("invalid redis url: {e}")))?;
        Ok(Self {
            client,
            connection: OnceCell::new(),
        })
    }

    async fn connection(&self) -> Result<ConnectionManager, CacheError> {
        self.connection
            .get_or_try_init(|| ConnectionManager::new(self.client.clone()))
            .await
            .cloned()
            .map_err(|e| CacheError::Unavailable(format!("redis connect failed: {e}")))
    }
}

impl CacheStore for RedisCacheStore {
    fn name(&self) -> &str {
        "redis"
    }

    fn get<'a>(&'a self, key: &'a str) -> CacheFuture<'a, Option<String>> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            let value: Option<String> = conn
                .get(key)
                .await
                .map_err(|e| CacheError::Unavailable(e.to_string()))?;
            Ok(value)
        })
    }

    fn set<'a>(&'a self, key: &'a str, value: String, ttl: Duration) -> CacheFuture<'a, ()> {
        Box::pin(async move {
            let mut conn = self.connection().await?;
            // SET EX rejects a zero expiry.
            let seconds = ttl.as_secs().max(1);
            let _: () = conn
                .set_ex(key, value, seconds)
                .await
                .map_err(|e| CacheError::Unavailable(e.to_string()))?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(RedisCacheStore::new("definitely not redis").is_err());
    }

    #[tokio::test]
    async fn unreachable_server_reports_unavailable() {
        let store = RedisCacheStore::new("redis://127.0.0.1:1/").unwrap();
        let result = tokio::time::timeout(Duration::from_secs(5), store.get("k")).await;
        if let Ok(inner) = result {
            assert!(matches!(inner, Err(CacheError::Unavailable(_))));
        }
    }
}
