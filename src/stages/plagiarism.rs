//! Plagiarism stage: estimated fraction of the text that overlaps known
//! sources.

use crate::pipeline::transformer::{TextTransformer, TransformFuture};
use crate::pipeline::{StageInput, StageResult};
use crate::providers::EnsembleScorer;
use crate::text::{count_phrases, split_sentences, words};
use serde_json::json;
use regex::Regex;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Scores above this are reported as plagiarized.
pub const PLAGIARIZED_THRESHOLD: f64 = 0.3;

const SHORT_TEXT_SCORE: f64 = 0.05;
const MIN_WORDS: usize = 10;

const ATTRIBUTION_PHRASES: &[&str] = &[
    "according to",
    "as stated by",
    "research shows",
    "studies indicate",
    "it has been proven",
    "experts agree",
    "scientists say",
    "research suggests",
];

static CITATIONS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        Regex::new(r"\(\w+,\s*\d{4}\)").expect("static pattern"),
        Regex::new(r"\[\d+\]").expect("static pattern"),
        Regex::new(r"\(\d+\)").expect("static pattern"),
    ]
});

/// Boilerplate sentences that turn up verbatim across the web.
const REFERENCE_CORPUS: &[&str] = &[
    "the quick brown fox jumps over the lazy dog",
    "lorem ipsum dolor sit amet consectetur adipiscing elit sed do eiusmod tempor",
    "in today's fast-paced world technology plays an important role in our daily lives",
    "since the dawn of time humans have sought to understand the world around them",
    "artificial intelligence is the simulation of human intelligence processes by machines",
    "climate change is one of the most pressing issues facing humanity today",
    "all rights reserved no part of this publication may be reproduced",
    "this website uses cookies to ensure you get the best experience on our website",
];

static REFERENCE_SHINGLES: LazyLock<HashSet<String>> = LazyLock::new(|| {
    REFERENCE_CORPUS
        .iter()
        .flat_map(|sentence| shingles(&words(sentence), 4))
        .collect()
});

fn shingles(tokens: &[String], size: usize) -> Vec<String> {
    tokens.windows(size).map(|w| w.join(" ")).collect()
}

/// Local estimate: attribution phrases, citations, repeated sentence
/// openings, repeated trigrams and overlap with the bundled corpus.
#[allow(clippy::cast_precision_loss)]
pub fn heuristic_plagiarism_score(text: &str) -> f64 {
    let tokens = words(text);
    if tokens.len() < MIN_WORDS {
        return SHORT_TEXT_SCORE;
    }
    let mut score = 0.0;

    score += (0.05 * count_phrases(text, ATTRIBUTION_PHRASES) as f64).min(0.2);

    let citations: usize = CITATIONS.iter().map(|re| re.find_iter(text).count()).sum();
    score += (0.1 * citations as f64).min(0.3);

    let sentences = split_sentences(text);
    if sentences.len() > 2 {
        let mut openings: HashMap<String, usize> = HashMap::new();
        for sentence in &sentences {
            let first = words(sentence).into_iter().next().unwrap_or_default();
            *openings.entry(first).or_insert(0) += 1;
        }
        let max_opening = openings.values().copied().max().unwrap_or(0) as f64;
        score += (max_opening / sentences.len() as f64 * 0.4).min(0.2);
    }

    let trigrams = shingles(&tokens, 3);
    if !trigrams.is_empty() {
        let distinct: HashSet<&String> = trigrams.iter().collect();
        let repeated = trigrams.len() - distinct.len();
        score += (repeated as f64 / trigrams.len() as f64).min(0.2);
    }

    let fourgrams = shingles(&tokens, 4);
    if !fourgrams.is_empty() {
        let overlapping = fourgrams
            .iter()
            .filter(|g| REFERENCE_SHINGLES.contains(*g))
            .count();
        score += overlapping as f64 / fourgrams.len() as f64 * 0.5;
    }

    score.clamp(0.0, 1.0)
}

/// Sentences scoring below this are flagged for rewording.
pub const UNIQUENESS_FLOOR: f64 = 0.7;

const GENERIC_OPENERS: &[&str] = &["the", "it", "this", "that", "there", "here"];
const STOCK_LINKS: &[&str] = &["in order to", "as a result", "due to", "because of"];

/// How original one sentence looks on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentenceUniqueness {
    pub index: usize,
    pub sentence: String,
    pub uniqueness: f64,
    pub needs_improvement: bool,
}

/// Per-sentence uniqueness: starts at 1 and loses points for a generic
/// opener, repeated words, stock linking phrases and overlap with the
/// bundled corpus.
#[allow(clippy::cast_precision_loss)]
pub fn sentence_uniqueness(text: &str) -> Vec<SentenceUniqueness> {
    split_sentences(text)
        .into_iter()
        .enumerate()
        .map(|(index, sentence)| {
            let tokens = words(&sentence);
            let mut uniqueness: f64 = 1.0;

            if tokens
                .first()
                .is_some_and(|first| GENERIC_OPENERS.contains(&first.as_str()))
            {
                uniqueness -= 0.1;
            }

            let mut counts: HashMap<&str, usize> = HashMap::new();
            for token in &tokens {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
            let max_repeat = counts.values().copied().max().unwrap_or(1).saturating_sub(1);
            uniqueness -= (0.05 * max_repeat as f64).min(0.3);

            uniqueness -= 0.05 * count_phrases(&sentence, STOCK_LINKS) as f64;

            let fourgrams = shingles(&tokens, 4);
            if !fourgrams.is_empty() {
                let overlapping = fourgrams
                    .iter()
                    .filter(|g| REFERENCE_SHINGLES.contains(*g))
                    .count();
                uniqueness -= overlapping as f64 / fourgrams.len() as f64 * 0.5;
            }

            let uniqueness = uniqueness.clamp(0.0, 1.0);
            SentenceUniqueness {
                index,
                sentence,
                uniqueness,
                needs_improvement: uniqueness < UNIQUENESS_FLOOR,
            }
        })
        .collect()
}

fn plagiarism_result(input: &StageInput, score: f64) -> StageResult {
    let result = StageResult::new(input.text.clone(), score);
    let plagiarized = result.score > PLAGIARIZED_THRESHOLD;
    result
        .with_meta("is_plagiarized", plagiarized)
        .with_meta("sentences", json!(sentence_uniqueness(&input.text)))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicPlagiarismChecker;

impl TextTransformer for HeuristicPlagiarismChecker {
    fn name(&self) -> &str {
        "heuristic"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            Ok(plagiarism_result(input, heuristic_plagiarism_score(&input.text)))
        })
    }
}

/// External plagiarism services queried as an ensemble.
pub struct ProviderPlagiarismChecker {
    ensemble: EnsembleScorer,
}

impl ProviderPlagiarismChecker {
    pub fn new(ensemble: EnsembleScorer) -> Self {
        Self { ensemble }
    }
}

impl TextTransformer for ProviderPlagiarismChecker {
    fn name(&self) -> &str {
        "providers"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            let ensemble = self.ensemble.score(&input.text).await?;
            Ok(plagiarism_result(input, ensemble.score)
                .with_meta("providers", ensemble.providers)
                .with_meta("failures", ensemble.failures)
                .with_meta("provider_scores", json!(ensemble.breakdown)))
        })
    }
}
