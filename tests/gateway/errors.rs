use crate::support::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

#[tokio::test]
async fn blank_text_is_a_bad_request() {
    let server = GatewayTestServer::start().await;
    for path in [
        "/api/grammar",
        "/api/humanize",
        "/api/detect",
        "/api/plagiarism",
        "/api/convert",
    ] {
        let response = reqwest::Client::new()
            .post(server.url(path))
            .json(&json!({"text": "   "}))
            .send()
            .await
            .expect("request should complete");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        let body: Value = response.json().await.expect("error should be json");
        assert_eq!(body["error"], "Text must not be empty", "{path}");
    }
}

#[tokio::test]
async fn malformed_json_is_reported() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/convert"))
        .header("Content-Type", "application/json")
        .body("{\"text\": ")
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error should be json");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("Invalid JSON: "))
    );
}

#[tokio::test]
async fn unknown_tone_is_reported_as_invalid_json() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/humanize"))
        .json(&json!({"text": "Hello there.", "tone": "pirate"}))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overlong_text_is_rejected() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/detect"))
        .json(&json!({"text": "a".repeat(10_001)}))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("error should be json");
    assert!(
        body["error"]
            .as_str()
            .is_some_and(|msg| msg.starts_with("Text is too long"))
    );
}

#[tokio::test]
async fn oversized_body_hits_the_limit() {
    let server = GatewayTestServer::start().await;
    let response = reqwest::Client::new()
        .post(server.url("/api/convert"))
        .json(&json!({"text": "b".repeat(70_000)}))
        .send()
        .await
        .expect("request should complete");
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}
