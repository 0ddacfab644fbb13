use super::Config;
use super::types::default_config_dir;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

impl Config {
    /// Load `~/.humanizer/config.toml`, writing the defaults on first run.
    pub fn load_or_init() -> Result<Self> {
        let config_dir = default_config_dir();
        let config_path = config_dir.join("config.toml");

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir).context("Failed to create .humanizer directory")?;
        }

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            let config = Self {
                config_path,
                ..Self::default()
            };
            config.validate()?;
            config.save()?;
            Ok(config)
        }
    }

    /// Load an explicit config file. A missing file is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let mut config = Self::from_toml_str(&contents)?;
        config.config_path = path.to_path_buf();
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let toml_str = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&self.config_path, toml_str).context("Failed to write config file")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CacheBackend;

    #[test]
    fn empty_toml_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.providers.rewrite.model, "gpt-4o-mini");
    }

    #[test]
    fn partial_sections_merge_with_defaults() {
        let config = Config::from_toml_str(
            r#"
[gateway]
port = 9100

[cache]
backend = "redis"
url = "redis://cache:6379"

[providers.detection.gptzero]
api_key = "gz-key"
"#,
        )
        .unwrap();
        assert_eq!(config.gateway.port, 9100);
        assert_eq!(config.gateway.host, "127.0.0.1");
        assert_eq!(config.cache.backend, CacheBackend::Redis);
        assert_eq!(config.cache.default_ttl_secs, 3600);
        assert!(config.providers.detection.gptzero.enabled());
        assert!(!config.providers.detection.turnitin.enabled());
    }

    #[test]
    fn invalid_values_fail_validation() {
        let err = Config::from_toml_str("[pipeline]\nmax_text_chars = 0\n").unwrap_err();
        assert!(err.to_string().contains("max_text_chars"));
    }

    #[test]
    fn save_then_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut config = Config {
            config_path: path.clone(),
            ..Config::default()
        };
        config.cache.key_prefix = "svc".into();
        config.save().unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.cache.key_prefix, "svc");
        assert_eq!(loaded.config_path, path);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from(&dir.path().join("absent.toml")).is_err());
    }
}
