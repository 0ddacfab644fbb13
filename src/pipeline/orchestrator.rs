use super::cached::CachedStage;
use super::confidence::{ConfidenceInputs, confidence};
use super::transformer::TransformChain;
use super::types::{
    ConversionRequest, ConversionResponse, Stage, StageInput, StageResult, Tone, validate_text,
};
use crate::cache::{self, CacheAdapter, CacheStats};
use crate::config::Config;
use crate::error::HumanizerError;
use crate::observability::{self, Observer, ObserverEvent, ObserverMetric};
use crate::providers::{EnsembleScorer, LanguageToolClient, RewriteClient, build_engine_client};
use crate::stages::{
    HeuristicDetector, HeuristicPlagiarismChecker, LanguageToolCorrector, ModelHumanizer,
    ProviderDetector, ProviderPlagiarismChecker, RuleBasedCorrector, RuleBasedHumanizer,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use strum::IntoStaticStr;
use tracing::Instrument;
use uuid::Uuid;

/// Lifecycle of one conversion request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum ConversionState {
    Received,
    GrammarDone,
    Humanized,
    Detected,
    PlagiarismChecked,
    Complete,
}

/// The four cached stages plus the shared cache and observer.
///
/// Built once at startup and shared by every request; holds no per-request
/// state besides the in-flight counter.
pub struct Pipeline {
    grammar: CachedStage,
    humanize: CachedStage,
    detection: CachedStage,
    plagiarism: CachedStage,
    cache: Arc<CacheAdapter>,
    observer: Arc<dyn Observer>,
    max_text_chars: usize,
    in_flight: AtomicU64,
}

impl Pipeline {
    /// Build the cache store and observer from config, then the stages.
    pub fn from_config(config: &Config) -> Self {
        let observer = observability::create_observer(&config.observability);
        let store = cache::create_store(&config.cache);
        let cache = Arc::new(CacheAdapter::new(store, &config.cache, observer.clone()));
        Self::new(config, cache, observer)
    }

    pub fn new(config: &Config, cache: Arc<CacheAdapter>, observer: Arc<dyn Observer>) -> Self {
        let client = build_engine_client(config.reliability.attempt_timeout() * 2);
        let providers = &config.providers;
        let chain = |stage: Stage| {
            TransformChain::new(stage)
                .with_reliability(&config.reliability)
                .with_observer(observer.clone())
        };

        let mut grammar = chain(Stage::Grammar);
        if providers.grammar.enabled() {
            grammar = grammar.with_engine(Box::new(LanguageToolCorrector::new(
                LanguageToolClient::new(&providers.grammar, client.clone()),
            )));
        }
        let grammar = grammar.with_engine(Box::new(RuleBasedCorrector));

        let mut humanize = chain(Stage::Humanize);
        if providers.rewrite.enabled() {
            humanize = humanize.with_engine(Box::new(ModelHumanizer::new(RewriteClient::new(
                &providers.rewrite,
                client.clone(),
            ))));
        }
        let humanize = humanize.with_engine(Box::new(RuleBasedHumanizer));

        let detectors = EnsembleScorer::detection(&providers.detection, &client);
        let detector_names = detectors.provider_names().join(",");
        let mut detection = chain(Stage::Detection);
        if !detectors.is_empty() {
            detection = detection.with_engine(Box::new(ProviderDetector::new(detectors)));
        }
        let detection = detection.with_engine(Box::new(HeuristicDetector));

        let checkers = EnsembleScorer::plagiarism(&providers.plagiarism, &client);
        let checker_names = checkers.provider_names().join(",");
        let mut plagiarism = chain(Stage::Plagiarism);
        if !checkers.is_empty() {
            plagiarism =
                plagiarism.with_engine(Box::new(ProviderPlagiarismChecker::new(checkers)));
        }
        let plagiarism = plagiarism.with_engine(Box::new(HeuristicPlagiarismChecker));

        let default_ttl = config.cache.default_ttl();
        let cached = |chain: TransformChain, ttl: Duration| {
            CachedStage::new(chain, cache.clone(), ttl, observer.clone())
        };

        let pipeline = Self {
            grammar: cached(grammar, default_ttl)
                .with_option("language", providers.grammar.language.as_str()),
            humanize: cached(humanize, config.cache.humanize_ttl())
                .with_option("model", providers.rewrite.model.as_str())
                .with_option("temperature", providers.rewrite.temperature.to_string()),
            detection: cached(detection, default_ttl).with_option("providers", detector_names),
            plagiarism: cached(plagiarism, default_ttl).with_option("providers", checker_names),
            cache,
            observer,
            max_text_chars: config.pipeline.max_text_chars,
            in_flight: AtomicU64::new(0),
        };
        tracing::info!(services = ?pipeline.services(), "Pipeline ready");
        pipeline
    }

    /// Engine names per stage, in fallback order.
    pub fn services(&self) -> BTreeMap<String, Vec<String>> {
        [&self.grammar, &self.humanize, &self.detection, &self.plagiarism]
            .into_iter()
            .map(|stage| {
                (
                    stage.stage().to_string(),
                    stage
                        .engine_names()
                        .into_iter()
                        .map(str::to_string)
                        .collect(),
                )
            })
            .collect()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache_healthy(&self) -> bool {
        self.cache.is_healthy()
    }

    pub fn max_text_chars(&self) -> usize {
        self.max_text_chars
    }

    /// Run the full pipeline. Fails only on invalid input; every stage
    /// failure degrades instead.
    pub async fn convert(
        &self,
        request: &ConversionRequest,
    ) -> Result<ConversionResponse, HumanizerError> {
        request.validate(self.max_text_chars)?;

        let request_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!("convert", request_id = %request_id, tone = %request.tone);
        let _in_flight = InFlight::enter(&self.in_flight, self.observer.as_ref());

        async {
            let started = Instant::now();
            self.transition(&request_id, ConversionState::Received);

            let grammar_input = StageInput::new(request.text.clone());
            let grammar = self.grammar.run(&grammar_input).await;
            self.transition(&request_id, ConversionState::GrammarDone);

            let humanize_input = StageInput::new(grammar.output_text.clone())
                .with_tone(request.tone)
                .with_preserve_meaning(request.preserve_meaning);
            let humanized = self.humanize.run(&humanize_input).await;
            self.transition(&request_id, ConversionState::Humanized);

            let scoring_input = StageInput::new(humanized.output_text.clone());
            let (detection, plagiarism) = tokio::join!(
                async {
                    if request.check_ai_detection {
                        Some(self.detection.run(&scoring_input).await)
                    } else {
                        None
                    }
                },
                async {
                    if request.check_plagiarism {
                        Some(self.plagiarism.run(&scoring_input).await)
                    } else {
                        None
                    }
                },
            );
            if detection.is_some() {
                self.transition(&request_id, ConversionState::Detected);
            }
            if plagiarism.is_some() {
                self.transition(&request_id, ConversionState::PlagiarismChecked);
            }

            let confidence = confidence(&ConfidenceInputs {
                grammar: grammar.score,
                humanization: humanized.score,
                detection: detection.as_ref().map(|d| d.score),
                plagiarism: plagiarism.as_ref().map(|p| p.score),
            });
            self.transition(&request_id, ConversionState::Complete);

            let elapsed = started.elapsed();
            self.observer
                .record_event(&ObserverEvent::ConversionCompleted {
                    duration: elapsed,
                    confidence,
                });
            self.observer
                .record_metric(&ObserverMetric::RequestLatency(elapsed));

            Ok(ConversionResponse {
                original_text: request.text.clone(),
                converted_text: humanized.output_text.clone(),
                grammar,
                humanized,
                detection,
                plagiarism,
                confidence,
                processing_time_ms: u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            })
        }
        .instrument(span)
        .await
    }

    pub async fn grammar(&self, text: &str) -> Result<StageResult, HumanizerError> {
        validate_text(text, self.max_text_chars)?;
        Ok(self.grammar.run(&StageInput::new(text)).await)
    }

    pub async fn humanize(
        &self,
        text: &str,
        tone: Tone,
        preserve_meaning: bool,
    ) -> Result<StageResult, HumanizerError> {
        validate_text(text, self.max_text_chars)?;
        let input = StageInput::new(text)
            .with_tone(tone)
            .with_preserve_meaning(preserve_meaning);
        Ok(self.humanize.run(&input).await)
    }

    pub async fn detect(&self, text: &str) -> Result<StageResult, HumanizerError> {
        validate_text(text, self.max_text_chars)?;
        Ok(self.detection.run(&StageInput::new(text)).await)
    }

    pub async fn plagiarism(&self, text: &str) -> Result<StageResult, HumanizerError> {
        validate_text(text, self.max_text_chars)?;
        Ok(self.plagiarism.run(&StageInput::new(text)).await)
    }

    fn transition(&self, request_id: &str, state: ConversionState) {
        let state: &'static str = state.into();
        tracing::debug!(state, "Conversion state changed");
        self.observer.record_event(&ObserverEvent::StateChanged {
            request_id: request_id.to_string(),
            state,
        });
    }
}

/// Counts a request as in flight until dropped.
struct InFlight<'a> {
    counter: &'a AtomicU64,
    observer: &'a dyn Observer,
}

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicU64, observer: &'a dyn Observer) -> Self {
        let now = counter.fetch_add(1, Ordering::Relaxed) + 1;
        observer.record_metric(&ObserverMetric::InFlightRequests(now));
        Self { counter, observer }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let now = self.counter.fetch_sub(1, Ordering::Relaxed).saturating_sub(1);
        self.observer
            .record_metric(&ObserverMetric::InFlightRequests(now));
    }
}
