use super::lexicon::{AI_STOCK_PHRASES, CONVERSATIONAL_MARKERS, KNOWN_CONNECTORS, connectors};
use super::lexicon::ConnectorKind;
use crate::pipeline::Tone;
use crate::text::{FUNCTION_WORDS, count_phrases, split_sentences, words};
use std::collections::HashSet;

const BASE: f64 = 0.40;

/// How human the text reads, in `[0, 1]`.
///
/// Rewards lexical variety, uneven sentence lengths, contractions and
/// conversational markers, tone-appropriate connectors and a natural share
/// of function words. Each stock AI phrase costs a little.
#[allow(clippy::cast_precision_loss)]
pub fn humanization_score(text: &str, tone: Tone) -> f64 {
    let tokens = words(text);
    if tokens.is_empty() {
        return 0.0;
    }
    let total = tokens.len() as f64;
    let sentences = split_sentences(text);

    let mut score = BASE;

    let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
    score += 0.15 * (unique.len() as f64 / total);

    if sentences.len() >= 2 {
        let lengths: Vec<f64> = sentences.iter().map(|s| words(s).len() as f64).collect();
        let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
        if mean > 0.0 {
            let variance =
                lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;
            let cv = variance.sqrt() / mean;
            score += (cv * 0.3).min(0.15);
        }
    }

    let contractions = tokens.iter().filter(|t| t.contains('\'')).count();
    let markers = count_phrases(text, CONVERSATIONAL_MARKERS);
    score += (0.05 * (contractions + markers) as f64).min(0.15);

    let tone_openers: Vec<String> = [
        ConnectorKind::Addition,
        ConnectorKind::Contrast,
        ConnectorKind::Conclusion,
    ]
    .iter()
    .flat_map(|kind| connectors(tone, *kind))
    .map(|c| c.trim_end_matches(',').to_lowercase())
    .collect();
    let connected = sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            tone_openers
                .iter()
                .any(|c| lower.starts_with(&format!("{c} ")) || lower.starts_with(&format!("{c},")))
        })
        .count();
    score += (0.05 * connected as f64).min(0.1);

    if tokens.len() > 10 {
        let function_words = tokens
            .iter()
            .filter(|t| FUNCTION_WORDS.contains(&t.as_str()))
            .count();
        score += (function_words as f64 / total * 0.5).min(0.1);
    }

    score -= (0.05 * count_phrases(text, AI_STOCK_PHRASES) as f64).min(0.2);
    score.clamp(0.0, 1.0)
}

/// Share of sentences that open with any recognised connector.
#[allow(clippy::cast_precision_loss)]
pub fn connector_ratio(text: &str) -> f64 {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return 0.0;
    }
    let opened = sentences
        .iter()
        .filter(|s| {
            let lower = s.to_lowercase();
            KNOWN_CONNECTORS
                .iter()
                .any(|(phrase, _)| lower.starts_with(&format!("{phrase},")))
        })
        .count();
    opened as f64 / sentences.len() as f64
}
