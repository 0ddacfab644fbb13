use super::transformer::TransformChain;
use super::types::{META_CACHED, Stage, StageInput, StageResult};
use crate::cache::CacheAdapter;
use crate::observability::{Observer, ObserverEvent, ObserverMetric};
use crate::text::normalize_whitespace;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A stage chain behind the result cache.
///
/// The fingerprint covers the input text, the request options that change
/// the stage's output (tone and `preserve_meaning` for humanization) and a
/// fixed set of configuration options (engine list, model, providers), so a
/// configuration change never serves stale results. Degraded results are
/// not written back.
///
/// The fingerprint hashes whitespace-normalised text, so the chain runs on
/// that same normalised text: two inputs sharing a key always compute the
/// same result.
pub struct CachedStage {
    chain: TransformChain,
    cache: Arc<CacheAdapter>,
    ttl: Duration,
    fixed_options: BTreeMap<String, String>,
    observer: Arc<dyn Observer>,
}

impl CachedStage {
    pub fn new(
        chain: TransformChain,
        cache: Arc<CacheAdapter>,
        ttl: Duration,
        observer: Arc<dyn Observer>,
    ) -> Self {
        let mut fixed_options = BTreeMap::new();
        fixed_options.insert("engines".to_string(), chain.engine_names().join(","));
        Self {
            chain,
            cache,
            ttl,
            fixed_options,
            observer,
        }
    }

    pub fn with_option(mut self, key: &str, value: impl Into<String>) -> Self {
        self.fixed_options.insert(key.to_string(), value.into());
        self
    }

    pub fn stage(&self) -> Stage {
        self.chain.stage()
    }

    pub fn engine_names(&self) -> Vec<&str> {
        self.chain.engine_names()
    }

    pub fn fingerprint(&self, input: &StageInput) -> String {
        let mut options = self.fixed_options.clone();
        if self.stage() == Stage::Humanize {
            options.insert("tone".to_string(), input.tone.to_string());
            options.insert(
                "preserve_meaning".to_string(),
                input.preserve_meaning.to_string(),
            );
        }
        self.cache.fingerprint(self.stage(), &input.text, &options)
    }

    pub async fn run(&self, input: &StageInput) -> StageResult {
        let started = Instant::now();
        let stage = self.stage();
        let normalized = StageInput {
            text: normalize_whitespace(&input.text),
            ..input.clone()
        };
        let input = &normalized;
        let key = self.fingerprint(input);

        if let Some(mut hit) = self.cache.get(&key).await {
            tracing::debug!(stage = %stage, "Cache hit");
            self.observer
                .record_metric(&ObserverMetric::CacheHit { stage });
            hit.set_meta(META_CACHED, true);
            self.record_completion(&hit, started, true);
            return hit;
        }
        self.observer
            .record_metric(&ObserverMetric::CacheMiss { stage });

        let mut result = self.chain.run(input).await;
        if result.degraded() {
            tracing::debug!(stage = %stage, "Degraded result not cached");
        } else {
            self.cache.set(&key, &result, self.ttl).await;
        }
        result.set_meta(META_CACHED, false);
        self.record_completion(&result, started, false);
        result
    }

    fn record_completion(&self, result: &StageResult, started: Instant, cache_hit: bool) {
        self.observer.record_event(&ObserverEvent::StageCompleted {
            stage: self.stage(),
            engine: result.engine().unwrap_or("unknown").to_string(),
            duration: started.elapsed(),
            cache_hit,
            degraded: result.degraded(),
        });
    }
}
