use super::super::{CacheBackend, EndpointConfig};
use super::Config;

fn non_empty(keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| std::env::var(key).ok().filter(|v| !v.trim().is_empty()))
}

fn apply_key(endpoint: &mut EndpointConfig, key: &str) {
    if let Some(value) = non_empty(&[key]) {
        endpoint.api_key = Some(value);
    }
}

impl Config {
    pub fn apply_env_overrides(&mut self) {
        if let Some(host) = non_empty(&["HUMANIZER_HOST", "HOST"]) {
            self.gateway.host = host;
        }

        if let Some(port_str) = non_empty(&["HUMANIZER_PORT", "PORT"])
            && let Ok(port) = port_str.parse::<u16>()
        {
            self.gateway.port = port;
        }

        if let Some(backend) = non_empty(&["HUMANIZER_CACHE_BACKEND"]) {
            match backend.to_ascii_lowercase().as_str() {
                "memory" => self.cache.backend = CacheBackend::Memory,
                "redis" => self.cache.backend = CacheBackend::Redis,
                "none" | "off" | "disabled" => self.cache.backend = CacheBackend::None,
                other => tracing::warn!("Ignoring unknown HUMANIZER_CACHE_BACKEND '{other}'"),
            }
        }

        if let Some(url) = non_empty(&["HUMANIZER_CACHE_URL", "REDIS_URL"]) {
            self.cache.url = url;
        }

        if let Some(key) = non_empty(&["LANGUAGETOOL_API_KEY"]) {
            self.providers.grammar.api_key = Some(key);
        }
        if let Some(username) = non_empty(&["LANGUAGETOOL_USERNAME"]) {
            self.providers.grammar.username = Some(username);
        }

        if let Some(key) = non_empty(&["HUMANIZER_REWRITE_API_KEY", "OPENAI_API_KEY"]) {
            self.providers.rewrite.api_key = Some(key);
        }
        if let Some(model) = non_empty(&["HUMANIZER_REWRITE_MODEL"]) {
            self.providers.rewrite.model = model;
        }
        if let Some(base_url) = non_empty(&["HUMANIZER_REWRITE_BASE_URL"]) {
            self.providers.rewrite.base_url = Some(base_url);
        }

        apply_key(&mut self.providers.detection.gptzero, "GPTZERO_API_KEY");
        apply_key(&mut self.providers.detection.originality, "ORIGINALITY_API_KEY");
        apply_key(&mut self.providers.detection.turnitin, "TURNITIN_API_KEY");
        apply_key(&mut self.providers.plagiarism.turnitin, "TURNITIN_API_KEY");
        apply_key(&mut self.providers.detection.copyleaks, "COPYLEAKS_API_KEY");
        apply_key(&mut self.providers.plagiarism.copyleaks, "COPYLEAKS_API_KEY");
        apply_key(&mut self.providers.plagiarism.grammarly, "GRAMMARLY_API_KEY");
    }
}
