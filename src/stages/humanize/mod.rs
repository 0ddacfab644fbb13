//! Humanize stage: an optional rewriting model, then the local
//! tone-conditioned rule set.

pub mod lexicon;
pub mod rules;
pub mod score;

pub use rules::rewrite;
pub use score::{connector_ratio, humanization_score};

use crate::error::ProviderError;
use crate::pipeline::transformer::{TextTransformer, TransformFuture};
use crate::pipeline::{StageInput, StageResult};
use crate::providers::RewriteClient;
use crate::text::{FactualTokens, split_sentences, word_count};

fn humanized_result(input: &StageInput, output: String) -> StageResult {
    let score = humanization_score(&output, input.tone);
    let sentences = split_sentences(&output).len();
    let words = word_count(&output);
    let connectors = connector_ratio(&output);
    StageResult::new(output, score)
        .with_meta("tone", input.tone.as_ref())
        .with_meta("sentence_count", sentences)
        .with_meta("word_count", words)
        .with_meta("connector_ratio", connectors)
}

/// Local engine; always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedHumanizer;

impl TextTransformer for RuleBasedHumanizer {
    fn name(&self) -> &str {
        "rules"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            let output = rewrite(&input.text, input.tone, input.preserve_meaning);
            Ok(humanized_result(input, output))
        })
    }
}

/// Remote engine backed by an OpenAI-compatible chat model.
pub struct ModelHumanizer {
    client: RewriteClient,
}

impl ModelHumanizer {
    pub fn new(client: RewriteClient) -> Self {
        Self { client }
    }
}

impl TextTransformer for ModelHumanizer {
    fn name(&self) -> &str {
        "model"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            let output = self
                .client
                .rewrite(&input.text, input.tone, input.preserve_meaning)
                .await?;
            if input.preserve_meaning {
                let missing = FactualTokens::extract_with(&input.text, lexicon::is_tone_vocabulary)
                    .missing_from(&output);
                if !missing.is_empty() {
                    return Err(ProviderError::rejected(
                        "rewrite-model",
                        format!("rewrite dropped factual tokens: {}", missing.join(", ")),
                    ));
                }
            }
            Ok(humanized_result(input, output).with_meta("model", self.client.model()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RewriteConfig;
    use crate::pipeline::Tone;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_engine(server: &MockServer) -> ModelHumanizer {
        let config = RewriteConfig {
            api_key: Some("sk-test".into()),
            base_url: Some(server.uri()),
            ..RewriteConfig::default()
        };
        ModelHumanizer::new(RewriteClient::new(&config, reqwest::Client::new()))
    }

    fn completion(content: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"role": "assistant", "content": content}}]
        }))
    }

    #[tokio::test]
    async fn rules_engine_reports_tone_and_counts() {
        let input = StageInput::new("We do not need it. It is fine.").with_tone(Tone::Casual);
        let result = RuleBasedHumanizer.transform(&input).await.unwrap();
        assert!(result.output_text.contains("don't"));
        assert_eq!(result.metadata["tone"], "casual");
        assert!(result.metadata["word_count"].as_u64().unwrap() > 0);
        assert!((0.0..=1.0).contains(&result.score));
    }

    #[tokio::test]
    async fn model_output_is_scored() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("Google opened 3 new offices, and it's growing fast."))
            .mount(&server)
            .await;

        let input = StageInput::new("Google has opened 3 new offices and is growing rapidly.");
        let result = model_engine(&server).transform(&input).await.unwrap();
        assert_eq!(
            result.output_text,
            "Google opened 3 new offices, and it's growing fast."
        );
        assert_eq!(result.metadata["model"], "gpt-4o-mini");
    }

    #[tokio::test]
    async fn model_output_losing_facts_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("The company opened a few offices."))
            .mount(&server)
            .await;

        let input = StageInput::new("Google has opened 3 new offices.");
        let err = model_engine(&server).transform(&input).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rejected { .. }));
    }

    #[tokio::test]
    async fn model_output_replacing_leading_name_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("The company has opened 3 new offices."))
            .mount(&server)
            .await;

        let input = StageInput::new("Google has opened 3 new offices.");
        let err = model_engine(&server).transform(&input).await.unwrap_err();
        assert!(err.to_string().contains("Google"), "{err}");
    }

    #[tokio::test]
    async fn model_may_reword_facts_when_allowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion("The company opened a few offices."))
            .mount(&server)
            .await;

        let input = StageInput::new("Google has opened 3 new offices.").with_preserve_meaning(false);
        assert!(model_engine(&server).transform(&input).await.is_ok());
    }
}
