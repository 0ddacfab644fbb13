use super::super::{CacheConfig, GatewayConfig, ObservabilityConfig, ProvidersConfig};
use crate::error::ConfigError;
use directories::UserDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to config.toml - computed from home, not serialized
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub gateway: GatewayConfig,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub reliability: ReliabilityConfig,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Limits applied to every conversion request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum accepted input length, in characters.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_max_text_chars() -> usize {
    10_000
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_text_chars: default_max_text_chars(),
        }
    }
}

/// Retry and timeout policy for external engines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReliabilityConfig {
    #[serde(default)]
    pub provider_retries: u32,
    #[serde(default = "default_provider_backoff_ms")]
    pub provider_backoff_ms: u64,
    #[serde(default = "default_attempt_timeout_ms")]
    pub attempt_timeout_ms: u64,
}

fn default_provider_backoff_ms() -> u64 {
    100
}

fn default_attempt_timeout_ms() -> u64 {
    1500
}

impl Default for ReliabilityConfig {
    fn default() -> Self {
        Self {
            provider_retries: 0,
            provider_backoff_ms: default_provider_backoff_ms(),
            attempt_timeout_ms: default_attempt_timeout_ms(),
        }
    }
}

impl ReliabilityConfig {
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.provider_backoff_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_path: default_config_dir().join("config.toml"),
            gateway: GatewayConfig::default(),
            cache: CacheConfig::default(),
            pipeline: PipelineConfig::default(),
            reliability: ReliabilityConfig::default(),
            providers: ProvidersConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

pub(super) fn default_config_dir() -> PathBuf {
    let home = UserDirs::new().map_or_else(|| PathBuf::from("."), |u| u.home_dir().to_path_buf());
    home.join(".humanizer")
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.max_text_chars == 0 {
            return Err(ConfigError::Validation(
                "pipeline.max_text_chars must be greater than zero".into(),
            ));
        }
        if self.gateway.max_body_bytes == 0 {
            return Err(ConfigError::Validation(
                "gateway.max_body_bytes must be greater than zero".into(),
            ));
        }
        if self.reliability.attempt_timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "reliability.attempt_timeout_ms must be greater than zero".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.providers.rewrite.temperature) {
            return Err(ConfigError::Validation(format!(
                "providers.rewrite.temperature must be within 0.0..=2.0, got {}",
                self.providers.rewrite.temperature
            )));
        }
        if self.cache.key_prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "cache.key_prefix must not be empty".into(),
            ));
        }
        Ok(())
    }
}
