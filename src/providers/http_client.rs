use reqwest::Client;
use std::time::Duration;

/// Shared client for every external engine. The per-request timeout is a
/// hard ceiling; the fallback chain applies its own, shorter, soft timeout.
pub fn build_engine_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(5).min(timeout))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}
