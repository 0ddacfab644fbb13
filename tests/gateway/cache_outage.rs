use crate::support::GatewayTestServer;
use humanizer::config::{CacheBackend, Config};
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn unreachable_redis_degrades_to_always_compute() {
    let mut config = Config::default();
    config.cache.backend = CacheBackend::Redis;
    config.cache.url = "redis://127.0.0.1:1".to_string();
    let server = GatewayTestServer::start_with(config).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let response = client
            .post(server.url("/api/convert"))
            .json(&json!({"text": "The cache is down but answers still arrive on time."}))
            .send()
            .await
            .expect("request should complete");
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.expect("response should be json");
        assert_eq!(body["grammar"]["metadata"]["cached"], false);
    }

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .expect("health should respond")
        .json()
        .await
        .expect("health should be json");
    assert_eq!(health["cache"]["backend"], "redis");
    assert_eq!(health["cache"]["hits"], 0);
}

#[tokio::test]
async fn disabled_cache_never_hits() {
    let mut config = Config::default();
    config.cache.backend = CacheBackend::None;
    let server = GatewayTestServer::start_with(config).await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        let body: Value = client
            .post(server.url("/api/grammar"))
            .json(&json!({"text": "Same text twice."}))
            .send()
            .await
            .expect("request should complete")
            .json()
            .await
            .expect("response should be json");
        assert_eq!(body["status"], "success");
    }

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .expect("health should respond")
        .json()
        .await
        .expect("health should be json");
    assert_eq!(health["cache"]["backend"], "none");
    assert_eq!(health["cache"]["hits"], 0);
}
