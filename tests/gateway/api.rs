use crate::support::GatewayTestServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn post(server: &GatewayTestServer, path: &str, body: Value) -> (StatusCode, Value) {
    let response = reqwest::Client::new()
        .post(server.url(path))
        .json(&body)
        .send()
        .await
        .expect("request should complete");
    let status = response.status();
    let body = response.json().await.expect("response should be json");
    (status, body)
}

#[tokio::test]
async fn root_and_health_describe_the_service() {
    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();

    let root: Value = client
        .get(server.url("/"))
        .send()
        .await
        .expect("root should respond")
        .json()
        .await
        .expect("root should be json");
    assert_eq!(root["status"], "active");

    let health: Value = client
        .get(server.url("/health"))
        .send()
        .await
        .expect("health should respond")
        .json()
        .await
        .expect("health should be json");
    assert_eq!(health["status"], "healthy");
    assert_eq!(health["services"]["grammar"], json!(["rules"]));
    assert_eq!(health["services"]["detection"], json!(["heuristic"]));
    assert_eq!(health["cache"]["backend"], "memory");
    assert!(health["runtime"]["components"].is_object());
}

#[tokio::test]
async fn grammar_endpoint_reports_edits() {
    let server = GatewayTestServer::start().await;
    let (status, body) = post(
        &server,
        "/api/grammar",
        json!({"text": "We should of gone there earlier ."}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["original_text"], "We should of gone there earlier .");
    assert_eq!(body["corrected_text"], "We should have gone there earlier.");
    assert!(body["edits_count"].as_u64().unwrap() >= 2);
    assert_eq!(body["degraded"], false);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn humanize_endpoint_follows_tone() {
    let server = GatewayTestServer::start().await;
    let (status, body) = post(
        &server,
        "/api/humanize",
        json!({"text": "We do not need it right now.", "tone": "casual"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["humanized_text"].as_str().unwrap().contains("don't"));
    assert_eq!(body["tone"], "casual");
    let score = body["humanization_score"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&score));
}

#[tokio::test]
async fn scoring_endpoints_return_scores_and_flags() {
    let server = GatewayTestServer::start().await;
    let text = "The implementation of artificial intelligence technologies has transformed many industries.";

    let (status, detect) = post(&server, "/api/detect", json!({"text": text})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detect["text"], text);
    assert!(detect["detection_score"].as_f64().unwrap() < 0.5);
    assert_eq!(detect["is_ai_detected"], false);

    let (status, plagiarism) = post(&server, "/api/plagiarism", json!({"text": text})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(plagiarism["plagiarism_score"].as_f64().unwrap() <= 0.3);
    assert_eq!(plagiarism["is_plagiarized"], false);
}

#[tokio::test]
async fn convert_returns_the_full_response() {
    let server = GatewayTestServer::start().await;
    let (status, body) = post(
        &server,
        "/api/convert",
        json!({
            "text": "The implementation of artificial intelligence technologies has revolutionized various industries.",
            "tone": "balanced",
            "preserve_meaning": true,
            "check_plagiarism": true,
            "check_ai_detection": true
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["converted_text"],
        "The implementation of artificial intelligence technologies has transformed many industries."
    );
    assert!(body["grammar"]["score"].is_number());
    assert!(body["humanized"]["metadata"]["engine"].is_string());
    assert!(body["detection"]["score"].is_number());
    assert!(body["plagiarism"]["score"].is_number());
    let confidence = body["confidence"].as_f64().unwrap();
    assert!(confidence > 0.7 && confidence <= 1.0, "{confidence}");
    assert!(body["processing_time_ms"].is_u64());
}

#[tokio::test]
async fn convert_omits_skipped_checks() {
    let server = GatewayTestServer::start().await;
    let (status, body) = post(
        &server,
        "/api/convert",
        json!({
            "text": "Short notes are fine too.",
            "check_plagiarism": false,
            "check_ai_detection": false
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("detection").is_none());
    assert!(body.get("plagiarism").is_none());
}

#[tokio::test]
async fn concurrent_conversions_match_their_own_single_results() {
    let bodies = [
        json!({"text": "The implementation of artificial intelligence technologies has revolutionized various industries.", "tone": "balanced"}),
        json!({"text": "We do not think the new policy is ready for a wider rollout.", "tone": "casual"}),
        json!({"text": "It's clear that the team can't finish the migration by Friday.", "tone": "formal"}),
        json!({"text": "In 2021, Microsoft utilized 3 data centers in Dublin.", "tone": "balanced"}),
        json!({"text": "We should of gone there earlier , but the roads were closed.", "tone": "casual"}),
    ];

    let reference = GatewayTestServer::start().await;
    let mut expected = Vec::new();
    for body in &bodies {
        let (status, response) = post(&reference, "/api/convert", body.clone()).await;
        assert_eq!(status, StatusCode::OK);
        expected.push(response);
    }

    let server = GatewayTestServer::start().await;
    let client = reqwest::Client::new();
    let requests = bodies.iter().map(|body| {
        let client = client.clone();
        let url = server.url("/api/convert");
        async move {
            let response = client
                .post(url)
                .json(body)
                .send()
                .await
                .expect("request should complete");
            let status = response.status();
            let value: Value = response.json().await.expect("response should be json");
            (status, value)
        }
    });
    let responses = futures_util::future::join_all(requests).await;

    for ((body, (status, got)), want) in bodies.iter().zip(&responses).zip(&expected) {
        assert_eq!(*status, StatusCode::OK);
        assert_eq!(got["original_text"], body["text"]);
        assert_eq!(got["original_text"], want["original_text"]);
        assert_eq!(got["converted_text"], want["converted_text"]);
        assert_eq!(got["confidence"], want["confidence"]);
    }
}
