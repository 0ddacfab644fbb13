//! OpenAI-compatible chat completion client used for model-backed
//! rewriting.

use super::scrub::{api_error, transport_error};
use crate::config::RewriteConfig;
use crate::error::ProviderError;
use crate::pipeline::Tone;
use reqwest::Client;
use serde::{Deserialize, Serialize};

const PROVIDER: &str = "rewrite-model";

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct RewriteClient {
    base_url: String,
    model: String,
    temperature: f64,
    /// Pre-computed `"Bearer <key>"` header value.
    auth_header: Option<String>,
    client: Client,
}

impl RewriteClient {
    pub fn new(config: &RewriteConfig, client: Client) -> Self {
        Self {
            base_url: config.resolved_base_url().to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
            auth_header: config.api_key.as_deref().map(|k| format!("Bearer {k}")),
            client,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn rewrite(
        &self,
        text: &str,
        tone: Tone,
        preserve_meaning: bool,
    ) -> Result<String, ProviderError> {
        let auth = self
            .auth_header
            .as_deref()
            .ok_or_else(|| ProviderError::NotConfigured {
                provider: PROVIDER.to_string(),
            })?;

        let system = system_prompt(tone, preserve_meaning);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                Message {
                    role: "system",
                    content: &system,
                },
                Message {
                    role: "user",
                    content: text,
                },
            ],
            temperature: self.temperature,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", auth)
            .json(&request)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;
        if !response.status().is_success() {
            return Err(api_error(PROVIDER, response).await);
        }

        let chat: ChatResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::rejected(PROVIDER, format!("malformed body: {e}")))?;
        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|c| c.trim().trim_matches('"').trim().to_string())
            .unwrap_or_default();
        if content.is_empty() {
            return Err(ProviderError::rejected(PROVIDER, "empty completion"));
        }
        Ok(content)
    }
}

fn tone_description(tone: Tone) -> &'static str {
    match tone {
        Tone::Formal => "formal and professional",
        Tone::Casual => "casual and conversational",
        Tone::Balanced => "natural and balanced",
    }
}

fn system_prompt(tone: Tone, preserve_meaning: bool) -> String {
    let mut prompt = format!(
        "Rewrite the user's text so it reads as {} human writing. \
         Vary sentence length and structure and avoid stock phrases.",
        tone_description(tone)
    );
    if preserve_meaning {
        prompt.push_str(
            " Keep the meaning exactly. Do not change, add or drop any number, \
             name, date or acronym.",
        );
    }
    prompt.push_str(" Reply with the rewritten text only.");
    prompt
}
