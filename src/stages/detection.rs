//! Detection stage: probability that the text was machine generated.

use super::humanize::lexicon::AI_STOCK_PHRASES;
use crate::pipeline::transformer::{TextTransformer, TransformFuture};
use crate::pipeline::{StageInput, StageResult};
use crate::providers::EnsembleScorer;
use crate::text::{count_phrases, split_sentences, words};
use serde_json::json;
use std::collections::HashMap;

/// Scores above this are reported as AI generated.
pub const AI_DETECTED_THRESHOLD: f64 = 0.5;

const SHORT_TEXT_SCORE: f64 = 0.1;
const MIN_WORDS: usize = 10;

/// Word stems typical of corporate, machine-polished prose.
const FORMAL_STEMS: &[&str] = &["utiliz", "implement", "facilitat", "optimiz", "leverag"];

/// Local estimate built from surface statistics.
#[allow(clippy::cast_precision_loss)]
pub fn heuristic_detection_score(text: &str) -> f64 {
    let tokens = words(text);
    if tokens.len() < MIN_WORDS {
        return SHORT_TEXT_SCORE;
    }
    let total = tokens.len() as f64;
    let mut score = 0.0;

    let mut frequencies: HashMap<&str, usize> = HashMap::new();
    for token in &tokens {
        *frequencies.entry(token.as_str()).or_insert(0) += 1;
    }
    let max_frequency = frequencies.values().copied().max().unwrap_or(0) as f64;
    score += (max_frequency / total * 0.5).min(0.3);

    let lengths: Vec<f64> = split_sentences(text)
        .iter()
        .map(|s| words(s).len() as f64)
        .collect();
    if lengths.len() >= 2 {
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        let variance =
            lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
        score += 0.2 / (1.0 + variance);
    }

    score += (0.05 * count_phrases(text, AI_STOCK_PHRASES) as f64).min(0.3);

    let formal = tokens
        .iter()
        .filter(|t| FORMAL_STEMS.iter().any(|stem| t.starts_with(stem)))
        .count();
    score += (0.04 * formal as f64).min(0.2);

    if tokens.iter().any(|t| t.contains('\'')) {
        score -= 0.05;
    }
    score.clamp(0.0, 1.0)
}

fn detection_result(input: &StageInput, score: f64) -> StageResult {
    let result = StageResult::new(input.text.clone(), score);
    let detected = result.score > AI_DETECTED_THRESHOLD;
    result.with_meta("is_ai_detected", detected)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicDetector;

impl TextTransformer for HeuristicDetector {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            Ok(detection_result(input, heuristic_detection_score(&input.text)))
        })
    }
}

/// External detectors queried as an ensemble.
pub struct ProviderDetector {
    ensemble: EnsembleScorer,
}

impl ProviderDetector {
    pub fn new(ensemble: EnsembleScorer) -> Self {
        Self { ensemble }
    }
}

impl TextTransformer for ProviderDetector {
    fn name(&self) -> &str {
        "providers"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            let ensemble = self.ensemble.score(&input.text).await?;
            Ok(detection_result(input, ensemble.score)
                .with_meta("providers", ensemble.providers)
                .with_meta("failures", ensemble.failures)
                .with_meta("provider_scores", json!(ensemble.breakdown)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_text_has_fixed_score() {
        assert!((heuristic_detection_score("Too short to judge.") - 0.1).abs() < 1e-12);
    }

    #[test]
    fn corporate_prose_scores_above_casual_prose() {
        let stiff = "Furthermore, organizations utilize advanced platforms. Moreover, teams implement robust solutions. Consequently, companies leverage scalable systems. Overall, firms optimize complex workflows.";
        let loose = "We tried the new tool last week and honestly it's fine. Some bits broke, but the team didn't mind much and we'll keep using it for a while.";
        let stiff_score = heuristic_detection_score(stiff);
        let loose_score = heuristic_detection_score(loose);
        assert!(stiff_score > loose_score, "{stiff_score} <= {loose_score}");
        assert!(stiff_score > AI_DETECTED_THRESHOLD);
    }

    #[test]
    fn single_plain_sentence_scores_low() {
        let text = "The implementation of artificial intelligence technologies has transformed many industries.";
        let score = heuristic_detection_score(text);
        assert!((score - 0.09).abs() < 1e-9, "{score}");
    }

    #[tokio::test]
    async fn heuristic_engine_flags_result() {
        let input = StageInput::new("Too short.");
        let result = HeuristicDetector.transform(&input).await.unwrap();
        assert_eq!(result.output_text, "Too short.");
        assert_eq!(result.metadata["is_ai_detected"], false);
    }
}
