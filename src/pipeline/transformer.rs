use super::types::{META_DEGRADED, META_EDITS_COUNT, META_ENGINE, Stage, StageInput, StageResult};
use crate::config::ReliabilityConfig;
use crate::diagnostics::health;
use crate::error::ProviderError;
use crate::observability::{NoopObserver, Observer, ObserverEvent};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

pub type TransformFuture<'a> =
    Pin<Box<dyn Future<Output = Result<StageResult, ProviderError>> + Send + 'a>>;

/// One engine able to produce a stage result: a remote API or a local
/// rule set.
pub trait TextTransformer: Send + Sync {
    /// Engine identifier recorded in result metadata (e.g. "rules").
    fn name(&self) -> &str;

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a>;
}

/// Name recorded when every engine failed and the input is passed through.
pub const PASSTHROUGH_ENGINE: &str = "passthrough";

/// Ordered engines for one stage, with retry and fallback.
///
/// The first engine that succeeds wins. A result from any engine other
/// than the first is marked `degraded`. When every engine fails the input
/// is passed through with the stage's neutral score. `run` never fails.
pub struct TransformChain {
    stage: Stage,
    engines: Vec<Box<dyn TextTransformer>>,
    attempt_timeout: Duration,
    max_retries: u32,
    base_backoff_ms: u64,
    observer: Arc<dyn Observer>,
}

impl TransformChain {
    pub fn new(stage: Stage) -> Self {
        let reliability = ReliabilityConfig::default();
        Self {
            stage,
            engines: Vec::new(),
            attempt_timeout: reliability.attempt_timeout(),
            max_retries: reliability.provider_retries,
            base_backoff_ms: reliability.provider_backoff_ms,
            observer: Arc::new(NoopObserver),
        }
    }

    pub fn with_engine(mut self, engine: Box<dyn TextTransformer>) -> Self {
        self.engines.push(engine);
        self
    }

    pub fn with_reliability(mut self, reliability: &ReliabilityConfig) -> Self {
        self.attempt_timeout = reliability.attempt_timeout();
        self.max_retries = reliability.provider_retries;
        self.base_backoff_ms = reliability.provider_backoff_ms;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn engine_names(&self) -> Vec<&str> {
        self.engines.iter().map(|e| e.name()).collect()
    }

    pub async fn run(&self, input: &StageInput) -> StageResult {
        for (index, engine) in self.engines.iter().enumerate() {
            match self.attempt(engine.as_ref(), input).await {
                Ok(mut result) => {
                    health::record_ok(&health::engine_component(self.stage, engine.name()));
                    if index == 0 {
                        health::record_ok(&health::stage_component(self.stage));
                    } else {
                        health::record_degraded(
                            &health::stage_component(self.stage),
                            format!("served by fallback engine {}", engine.name()),
                        );
                    }
                    result.set_meta(META_ENGINE, engine.name());
                    result.set_meta(META_DEGRADED, index > 0);
                    return result;
                }
                Err(e) => {
                    health::record_error(&health::engine_component(self.stage, engine.name()), &e);
                    tracing::warn!(
                        stage = %self.stage,
                        engine = engine.name(),
                        "Engine failed, falling back: {e}"
                    );
                    self.observer.record_event(&ObserverEvent::EngineFallback {
                        stage: self.stage,
                        engine: engine.name().to_string(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::warn!(stage = %self.stage, "All engines failed, passing input through");
        health::record_error(
            &health::stage_component(self.stage),
            "every engine failed, input passed through",
        );
        self.passthrough(input)
    }

    async fn attempt(
        &self,
        engine: &dyn TextTransformer,
        input: &StageInput,
    ) -> Result<StageResult, ProviderError> {
        let mut backoff_ms = self.base_backoff_ms.max(10);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            let outcome = tokio::time::timeout(self.attempt_timeout, engine.transform(input))
                .await
                .unwrap_or_else(|_| {
                    Err(ProviderError::Timeout {
                        provider: engine.name().to_string(),
                        after_ms: u64::try_from(self.attempt_timeout.as_millis())
                            .unwrap_or(u64::MAX),
                    })
                });

            match outcome {
                Ok(result) => {
                    if attempt > 0 {
                        tracing::info!(
                            stage = %self.stage,
                            engine = engine.name(),
                            attempt,
                            "Engine recovered after retries"
                        );
                    }
                    return Ok(result);
                }
                Err(e) => {
                    let retryable = e.is_retryable();
                    last_error = Some(e);
                    if !retryable {
                        break;
                    }
                    if attempt < self.max_retries {
                        tracing::debug!(
                            stage = %self.stage,
                            engine = engine.name(),
                            attempt = attempt + 1,
                            max_retries = self.max_retries,
                            "Engine call failed, retrying"
                        );
                        tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                        backoff_ms = backoff_ms.saturating_mul(2).min(5_000);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ProviderError::NotConfigured {
            provider: engine.name().to_string(),
        }))
    }

    fn passthrough(&self, input: &StageInput) -> StageResult {
        let mut result = StageResult::new(input.text.clone(), self.stage.passthrough_score())
            .with_meta(META_ENGINE, PASSTHROUGH_ENGINE)
            .with_meta(META_DEGRADED, true);
        match self.stage {
            Stage::Grammar => result.set_meta(META_EDITS_COUNT, 0),
            Stage::Detection => result.set_meta("is_ai_detected", false),
            Stage::Plagiarism => result.set_meta("is_plagiarized", false),
            Stage::Humanize => {}
        }
        result
    }
}
