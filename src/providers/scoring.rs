//! Remote scoring APIs for the detection and plagiarism stages.

use super::scrub::{api_error, transport_error};
use crate::config::{DetectionProvidersConfig, EndpointConfig, PlagiarismProvidersConfig};
use crate::diagnostics::health;
use crate::error::ProviderError;
use crate::pipeline::Stage;
use futures_util::future::join_all;
use reqwest::Client;
use serde_json::{Value, json};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `X-API-KEY: <key>`
    ApiKeyHeader,
    /// `Authorization: Bearer <key>`
    Bearer,
}

/// Static description of one vendor endpoint: where to POST, how to
/// authenticate, what to send and where the score lives in the reply.
#[derive(Debug, Clone, Copy)]
pub struct ScoringApi {
    pub name: &'static str,
    pub default_url: &'static str,
    pub auth: AuthStyle,
    pub body: fn(&str) -> Value,
    /// JSON pointer to the numeric score.
    pub score_pointer: &'static str,
    /// Score is a percentage and must be divided by 100.
    pub percent: bool,
}

pub const GPTZERO_DETECTION: ScoringApi = ScoringApi {
    name: "gptzero",
    default_url: "https://api.gptzero.me/v2/predict",
    auth: AuthStyle::ApiKeyHeader,
    body: |text| json!({ "document": text, "version": "2024-01-15" }),
    score_pointer: "/documents/0/completely_generated_prob",
    percent: false,
};

pub const TURNITIN_DETECTION: ScoringApi = ScoringApi {
    name: "turnitin",
    default_url: "https://api.turnitin.com/api/v1/authenticity",
    auth: AuthStyle::Bearer,
    body: |text| json!({ "text": text, "language": "en" }),
    score_pointer: "/ai_similarity",
    percent: false,
};

pub const COPYLEAKS_DETECTION: ScoringApi = ScoringApi {
    name: "copyleaks",
    default_url: "https://api.copyleaks.com/v3/businesses/ai-detection",
    auth: AuthStyle::Bearer,
    body: |text| json!({ "text": text, "properties": { "aiDetection": true } }),
    score_pointer: "/aiDetection/probability",
    percent: false,
};

pub const ORIGINALITY_DETECTION: ScoringApi = ScoringApi {
    name: "originality",
    default_url: "https://api.originality.ai/api/v1/scan/ai",
    auth: AuthStyle::Bearer,
    body: |text| json!({ "content": text, "title": "AI Detection Check" }),
    score_pointer: "/ai_score",
    percent: false,
};

pub const COPYLEAKS_PLAGIARISM: ScoringApi = ScoringApi {
    name: "copyleaks",
    default_url: "https://api.copyleaks.com/v3/businesses/plagiarism",
    auth: AuthStyle::Bearer,
    body: |text| {
        json!({
            "text": text,
            "properties": {
                "scanning": { "internet": true, "repositories": true, "crossLanguage": true }
            }
        })
    },
    score_pointer: "/results/plagiarism",
    percent: true,
};

pub const TURNITIN_PLAGIARISM: ScoringApi = ScoringApi {
    name: "turnitin",
    default_url: "https://api.turnitin.com/api/v1/similarity",
    auth: AuthStyle::Bearer,
    body: |text| json!({ "text": text, "language": "en", "scan_type": "similarity" }),
    score_pointer: "/similarity",
    percent: true,
};

pub const GRAMMARLY_PLAGIARISM: ScoringApi = ScoringApi {
    name: "grammarly",
    default_url: "https://api.grammarly.com/v1/plagiarism",
    auth: AuthStyle::Bearer,
    body: |text| json!({ "text": text, "check_type": "plagiarism" }),
    score_pointer: "/plagiarism_score",
    percent: false,
};

/// One configured scoring endpoint.
pub struct HttpScorer {
    api: ScoringApi,
    url: String,
    api_key: String,
    client: Client,
}

impl HttpScorer {
    pub fn new(api: ScoringApi, endpoint: &EndpointConfig, client: Client) -> Option<Self> {
        if !endpoint.enabled() {
            return None;
        }
        let api_key = endpoint.api_key.clone()?;
        Some(Self {
            api,
            url: endpoint
                .url
                .clone()
                .unwrap_or_else(|| api.default_url.to_string()),
            api_key,
            client,
        })
    }

    pub fn name(&self) -> &'static str {
        self.api.name
    }

    pub async fn score(&self, text: &str) -> Result<f64, ProviderError> {
        let request = self.client.post(&self.url).json(&(self.api.body)(text));
        let request = match self.api.auth {
            AuthStyle::ApiKeyHeader => request.header("X-API-KEY", &self.api_key),
            AuthStyle::Bearer => request.bearer_auth(&self.api_key),
        };

        let response = request
            .send()
            .await
            .map_err(|e| transport_error(self.api.name, &e))?;
        if !response.status().is_success() {
            return Err(api_error(self.api.name, response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::rejected(self.api.name, format!("malformed body: {e}")))?;
        self.extract(&body)
    }

    fn extract(&self, body: &Value) -> Result<f64, ProviderError> {
        let raw = body
            .pointer(self.api.score_pointer)
            .and_then(Value::as_f64)
            .ok_or_else(|| {
                ProviderError::rejected(
                    self.api.name,
                    format!("missing numeric field {}", self.api.score_pointer),
                )
            })?;
        let score = if self.api.percent { raw / 100.0 } else { raw };
        if !(0.0..=1.0).contains(&score) {
            return Err(ProviderError::rejected(
                self.api.name,
                format!("score {score} outside [0, 1]"),
            ));
        }
        Ok(score)
    }
}

/// Weighted mean that leans towards the lower scores: each score `s`
/// weighs `1 / (s + 0.1)`.
pub fn weighted_mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    let (weighted_sum, total_weight) = scores.iter().fold((0.0, 0.0), |(sum, total), s| {
        let weight = 1.0 / (s + 0.1);
        (sum + s * weight, total + weight)
    });
    Some(weighted_sum / total_weight)
}

/// Scores from every configured endpoint, queried concurrently.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleScore {
    pub score: f64,
    pub providers: Vec<String>,
    pub failures: Vec<String>,
    /// Each answering provider's own score.
    pub breakdown: BTreeMap<String, f64>,
}

pub struct EnsembleScorer {
    stage: Stage,
    scorers: Vec<HttpScorer>,
}

impl EnsembleScorer {
    pub fn new(stage: Stage, scorers: Vec<HttpScorer>) -> Self {
        Self { stage, scorers }
    }

    pub fn detection(config: &DetectionProvidersConfig, client: &Client) -> Self {
        Self::new(
            Stage::Detection,
            [
                HttpScorer::new(GPTZERO_DETECTION, &config.gptzero, client.clone()),
                HttpScorer::new(TURNITIN_DETECTION, &config.turnitin, client.clone()),
                HttpScorer::new(COPYLEAKS_DETECTION, &config.copyleaks, client.clone()),
                HttpScorer::new(ORIGINALITY_DETECTION, &config.originality, client.clone()),
            ]
            .into_iter()
            .flatten()
            .collect(),
        )
    }

    pub fn plagiarism(config: &PlagiarismProvidersConfig, client: &Client) -> Self {
        Self::new(
            Stage::Plagiarism,
            [
                HttpScorer::new(COPYLEAKS_PLAGIARISM, &config.copyleaks, client.clone()),
                HttpScorer::new(TURNITIN_PLAGIARISM, &config.turnitin, client.clone()),
                HttpScorer::new(GRAMMARLY_PLAGIARISM, &config.grammarly, client.clone()),
            ]
            .into_iter()
            .flatten()
            .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.scorers.is_empty()
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.scorers.iter().map(HttpScorer::name).collect()
    }

    /// Query all endpoints. Fails only when none of them produced a score.
    pub async fn score(&self, text: &str) -> Result<EnsembleScore, ProviderError> {
        let results = join_all(self.scorers.iter().map(|scorer| scorer.score(text))).await;

        let mut scores = Vec::new();
        let mut providers = Vec::new();
        let mut failures = Vec::new();
        let mut breakdown = BTreeMap::new();
        for (scorer, result) in self.scorers.iter().zip(results) {
            let component = health::provider_component(self.stage, scorer.name());
            match result {
                Ok(score) => {
                    health::record_ok(&component);
                    scores.push(score);
                    providers.push(scorer.name().to_string());
                    breakdown.insert(scorer.name().to_string(), score);
                }
                Err(e) => {
                    tracing::warn!(provider = scorer.name(), "Scoring provider failed: {e}");
                    health::record_error(&component, &e);
                    failures.push(scorer.name().to_string());
                }
            }
        }

        match weighted_mean(&scores) {
            Some(score) => Ok(EnsembleScore {
                score,
                providers,
                failures,
                breakdown,
            }),
            None => Err(ProviderError::unavailable(
                "ensemble",
                format!("no provider answered ({})", failures.join(", ")),
            )),
        }
    }
}
