use serde::{Deserialize, Serialize};

/// External capabilities. Every provider is optional: a missing API key
/// simply leaves the stage on its local engine.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub grammar: LanguageToolConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
    #[serde(default)]
    pub detection: DetectionProvidersConfig,
    #[serde(default)]
    pub plagiarism: PlagiarismProvidersConfig,
}

/// LanguageTool `/v2/check` endpoint. Enabled by an API key (hosted
/// premium API) or by an explicit `base_url` (self-hosted server).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageToolConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    "en-US".into()
}

impl Default for LanguageToolConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            username: None,
            base_url: None,
            language: default_language(),
        }
    }
}

impl LanguageToolConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.languagetoolplus.com/v2";

    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty()) || self.base_url.is_some()
    }

    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

/// OpenAI-compatible chat completion endpoint used for model-backed
/// rewriting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriteConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_rewrite_model")]
    pub model: String,
    #[serde(default)]
    pub temperature: f64,
}

fn default_rewrite_model() -> String {
    "gpt-4o-mini".into()
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            model: default_rewrite_model(),
            temperature: 0.0,
        }
    }
}

impl RewriteConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.openai.com/v1";

    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    pub fn resolved_base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(Self::DEFAULT_BASE_URL)
            .trim_end_matches('/')
    }
}

/// One scoring API. `url` overrides the provider's public endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct EndpointConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl EndpointConfig {
    pub fn with_key(key: &str) -> Self {
        Self {
            api_key: Some(key.to_string()),
            url: None,
        }
    }

    pub fn enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DetectionProvidersConfig {
    #[serde(default)]
    pub gptzero: EndpointConfig,
    #[serde(default)]
    pub turnitin: EndpointConfig,
    #[serde(default)]
    pub copyleaks: EndpointConfig,
    #[serde(default)]
    pub originality: EndpointConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlagiarismProvidersConfig {
    #[serde(default)]
    pub copyleaks: EndpointConfig,
    #[serde(default)]
    pub turnitin: EndpointConfig,
    #[serde(default)]
    pub grammarly: EndpointConfig,
}
