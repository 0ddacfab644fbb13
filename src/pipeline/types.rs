use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use strum::{AsRefStr, Display, EnumString};

use crate::error::ValidationError;

/// Rewriting style requested by the caller.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tone {
    Formal,
    Casual,
    #[default]
    Balanced,
}

/// The four pipeline stages. The string form is used in fingerprints, logs
/// and metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Stage {
    Grammar,
    Humanize,
    Detection,
    Plagiarism,
}

impl Stage {
    /// Score reported when every engine of the stage failed and the input is
    /// passed through untouched.
    pub fn passthrough_score(self) -> f64 {
        match self {
            Self::Grammar => 1.0,
            Self::Humanize => 0.3,
            Self::Detection => 0.1,
            Self::Plagiarism => 0.05,
        }
    }
}

/// Everything a stage engine may look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageInput {
    pub text: String,
    pub tone: Tone,
    pub preserve_meaning: bool,
}

impl StageInput {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::default(),
            preserve_meaning: true,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn with_preserve_meaning(mut self, preserve_meaning: bool) -> Self {
        self.preserve_meaning = preserve_meaning;
        self
    }
}

pub const META_ENGINE: &str = "engine";
pub const META_DEGRADED: &str = "degraded";
pub const META_CACHED: &str = "cached";
pub const META_EDITS_COUNT: &str = "edits_count";

/// Output of one stage invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageResult {
    pub output_text: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl StageResult {
    /// Build a result; the score is clamped to `[0, 1]` (NaN becomes 0).
    pub fn new(output_text: impl Into<String>, score: f64) -> Self {
        Self {
            output_text: output_text.into(),
            score: clamp_unit(score),
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.to_string(), value.into());
        self
    }

    pub fn set_meta(&mut self, key: &str, value: impl Into<Value>) {
        self.metadata.insert(key.to_string(), value.into());
    }

    pub fn engine(&self) -> Option<&str> {
        self.metadata.get(META_ENGINE).and_then(Value::as_str)
    }

    pub fn degraded(&self) -> bool {
        self.metadata
            .get(META_DEGRADED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn cached(&self) -> bool {
        self.metadata
            .get(META_CACHED)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    pub fn edits_count(&self) -> u64 {
        self.metadata
            .get(META_EDITS_COUNT)
            .and_then(Value::as_u64)
            .unwrap_or(0)
    }
}

pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

fn default_true() -> bool {
    true
}

/// Body of `POST /api/convert`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionRequest {
    pub text: String,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default = "default_true")]
    pub preserve_meaning: bool,
    #[serde(default = "default_true")]
    pub check_plagiarism: bool,
    #[serde(default = "default_true")]
    pub check_ai_detection: bool,
}

impl ConversionRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tone: Tone::default(),
            preserve_meaning: true,
            check_plagiarism: true,
            check_ai_detection: true,
        }
    }

    pub fn validate(&self, max_chars: usize) -> Result<(), ValidationError> {
        validate_text(&self.text, max_chars)
    }
}

/// Reject blank or oversized input. Length is measured in characters.
pub fn validate_text(text: &str, max_chars: usize) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::EmptyText);
    }
    let len = text.chars().count();
    if len > max_chars {
        return Err(ValidationError::TextTooLong {
            len,
            max: max_chars,
        });
    }
    Ok(())
}

/// Full pipeline output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub original_text: String,
    pub converted_text: String,
    pub grammar: StageResult,
    pub humanized: StageResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<StageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plagiarism: Option<StageResult>,
    pub confidence: f64,
    pub processing_time_ms: u64,
}
