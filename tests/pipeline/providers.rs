use humanizer::config::{Config, EndpointConfig};
use humanizer::diagnostics::health;
use humanizer::pipeline::Stage;
use humanizer::pipeline::{ConversionRequest, Pipeline, Tone};
use serde_json::json;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEXT: &str = "Our quarterly report shows steady growth across every region we serve today.";

fn endpoint(server: &MockServer, route: &str, key: &str) -> EndpointConfig {
    EndpointConfig {
        api_key: Some(key.to_string()),
        url: Some(format!("{}{route}", server.uri())),
    }
}

#[tokio::test]
async fn answering_detector_is_used_and_named() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gptzero"))
        .and(header("X-API-KEY", "gz-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"completely_generated_prob": 0.72}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.providers.detection.gptzero = endpoint(&server, "/gptzero", "gz-key");
    let pipeline = Pipeline::from_config(&config);

    let result = pipeline.detect(TEXT).await.unwrap();
    assert_eq!(result.engine(), Some("providers"));
    assert!(!result.degraded());
    assert!((result.score - 0.72).abs() < 1e-9);
    assert_eq!(result.metadata["providers"], json!(["gptzero"]));
    assert_eq!(result.metadata["is_ai_detected"], true);
}

#[tokio::test]
async fn failing_detector_falls_back_to_heuristics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/originality"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.providers.detection.originality = endpoint(&server, "/originality", "orig-key");
    let pipeline = Pipeline::from_config(&config);

    let result = pipeline.detect(TEXT).await.unwrap();
    assert_eq!(result.engine(), Some("heuristic"));
    assert!(result.degraded());

    // Degraded results are not cached, so the provider is asked again.
    let again = pipeline.detect(TEXT).await.unwrap();
    assert!(!again.cached());
    let requests = server.received_requests().await.unwrap_or_default();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn each_provider_score_is_reported_and_tracked() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gptzero"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "documents": [{"completely_generated_prob": 0.72}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/turnitin"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ai_similarity": 0.1})))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/copyleaks"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.providers.detection.gptzero = endpoint(&server, "/gptzero", "gz-key");
    config.providers.detection.turnitin = endpoint(&server, "/turnitin", "ti-key");
    config.providers.detection.copyleaks = endpoint(&server, "/copyleaks", "cl-key");
    let pipeline = Pipeline::from_config(&config);

    let result = pipeline.detect(TEXT).await.unwrap();
    assert_eq!(result.engine(), Some("providers"));
    assert_eq!(
        result.metadata["provider_scores"],
        json!({"gptzero": 0.72, "turnitin": 0.1})
    );
    assert_eq!(result.metadata["failures"], json!(["copyleaks"]));

    let copyleaks = health::component(&health::provider_component(Stage::Detection, "copyleaks"))
        .expect("failed provider should be tracked");
    assert_eq!(copyleaks.status, health::Status::Error);
    let turnitin = health::component(&health::provider_component(Stage::Detection, "turnitin"))
        .expect("answering provider should be tracked");
    assert_eq!(turnitin.status, health::Status::Ok);
}

#[tokio::test]
async fn percentage_scores_are_scaled() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/copyleaks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": {"plagiarism": 40.0}
        })))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.providers.plagiarism.copyleaks = endpoint(&server, "/copyleaks", "cl-key");
    let pipeline = Pipeline::from_config(&config);

    let result = pipeline.plagiarism(TEXT).await.unwrap();
    assert_eq!(result.engine(), Some("providers"));
    assert!((result.score - 0.4).abs() < 1e-9);
    assert_eq!(result.metadata["is_plagiarized"], true);
}

#[tokio::test]
async fn languagetool_replacements_respect_utf16_offsets() {
    let server = MockServer::start().await;
    // "😀 " is three UTF-16 units, so "teh" starts at offset 3.
    Mock::given(method("POST"))
        .and(path("/check"))
        .and(body_string_contains("language=en-US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "matches": [{"offset": 3, "length": 3, "replacements": [{"value": "the"}]}]
        })))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.providers.grammar.base_url = Some(server.uri());
    let pipeline = Pipeline::from_config(&config);

    let result = pipeline.grammar("😀 teh cat sat.").await.unwrap();
    assert_eq!(result.engine(), Some("languagetool"));
    assert_eq!(result.output_text, "😀 the cat sat.");
    assert_eq!(result.edits_count(), 1);
}

#[tokio::test]
async fn rewrite_model_output_is_used_when_it_keeps_facts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "In 2022, Acme hired 40 people."}}]
        })))
        .mount(&server)
        .await;

    let mut config = Config::default();
    config.providers.rewrite.api_key = Some("sk-test".to_string());
    config.providers.rewrite.base_url = Some(server.uri());
    let pipeline = Pipeline::from_config(&config);

    let mut request = ConversionRequest::new("In 2022, Acme has hired a total of 40 people.");
    request.tone = Tone::Casual;
    let response = pipeline.convert(&request).await.unwrap();
    assert_eq!(response.humanized.engine(), Some("model"));
    assert_eq!(response.converted_text, "In 2022, Acme hired 40 people.");
    assert_eq!(response.humanized.metadata["model"], "gpt-4o-mini");
}
