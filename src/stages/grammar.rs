//! Grammar stage: LanguageTool when configured, then a deterministic
//! rule-based corrector.

use crate::error::ProviderError;
use crate::pipeline::transformer::{TextTransformer, TransformFuture};
use crate::pipeline::{META_EDITS_COUNT, StageInput, StageResult};
use crate::providers::{LanguageToolClient, apply_matches};
use crate::text::{capitalize_first, match_case, split_sentences, word_count};
use regex::{Captures, Regex};
use std::sync::LazyLock;

static EXTRA_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}|[\t\r\n\x0B\x0C]").expect("static pattern"));
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" +([,.!?;:])").expect("static pattern"));
static MISSING_SPACE_AFTER_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([,;!?])([A-Za-z])").expect("static pattern"));
static MISSING_SPACE_AFTER_PERIOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z]{2,})\.([A-Z][a-z])").expect("static pattern"));
static MODAL_OF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(could|should|would|must|might) of\b").expect("static pattern")
});
static MISSPELLING: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = MISSPELLINGS
        .iter()
        .map(|(wrong, _)| *wrong)
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b({alternatives})\b")).expect("static pattern")
});

const MISSPELLINGS: &[(&str, &str)] = &[
    ("accomodate", "accommodate"),
    ("acheive", "achieve"),
    ("alot", "a lot"),
    ("begining", "beginning"),
    ("beleive", "believe"),
    ("definately", "definitely"),
    ("enviroment", "environment"),
    ("goverment", "government"),
    ("grammer", "grammar"),
    ("occured", "occurred"),
    ("recieve", "receive"),
    ("recieved", "received"),
    ("seperate", "separate"),
    ("teh", "the"),
    ("thier", "their"),
    ("tommorow", "tomorrow"),
    ("untill", "until"),
    ("wich", "which"),
    ("wierd", "weird"),
];

/// Duplicates that are usually intentional.
const ALLOWED_REPEATS: &[&str] = &["that", "had"];

/// Words starting with a vowel letter but a consonant sound.
const CONSONANT_SOUND_PREFIXES: &[&str] = &["uni", "use", "usu", "uti", "eu", "one", "once", "ur"];

/// Words starting with a silent "h".
const SILENT_H_PREFIXES: &[&str] = &["hour", "honest", "honor", "honour", "heir"];

/// Corrected text and the number of individual edits applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correction {
    pub text: String,
    pub edits: usize,
}

/// `1 - min(1, edits / words)`; text without words scores 1.
#[allow(clippy::cast_precision_loss)]
pub fn grammar_score(edits: usize, words: usize) -> f64 {
    if words == 0 {
        return 1.0;
    }
    1.0 - (edits as f64 / words as f64).min(1.0)
}

fn replace_counting<F>(text: &str, re: &Regex, edits: &mut usize, mut rep: F) -> String
where
    F: FnMut(&Captures<'_>) -> String,
{
    re.replace_all(text, |caps: &Captures<'_>| {
        let replacement = rep(caps);
        if replacement != caps[0] {
            *edits += 1;
        }
        replacement
    })
    .into_owned()
}

/// Deterministic corrector for the most common mechanical errors.
pub fn correct(text: &str) -> Correction {
    let mut edits = 0;

    let mut out = replace_counting(text.trim(), &EXTRA_WHITESPACE, &mut edits, |_| " ".into());
    out = replace_counting(&out, &SPACE_BEFORE_PUNCT, &mut edits, |c| c[1].to_string());
    out = replace_counting(&out, &MISSING_SPACE_AFTER_PUNCT, &mut edits, |c| {
        format!("{} {}", &c[1], &c[2])
    });
    out = replace_counting(&out, &MISSING_SPACE_AFTER_PERIOD, &mut edits, |c| {
        format!("{}. {}", &c[1], &c[2])
    });
    out = replace_counting(&out, &MISSPELLING, &mut edits, |c| {
        let found = &c[1];
        let lower = found.to_lowercase();
        MISSPELLINGS
            .iter()
            .find(|(wrong, _)| *wrong == lower)
            .map_or_else(|| found.to_string(), |(_, right)| match_case(found, right))
    });
    out = replace_counting(&out, &MODAL_OF, &mut edits, |c| format!("{} have", &c[1]));

    let (tokens, token_edits) = fix_tokens(out.split(' ').filter(|t| !t.is_empty()).collect());
    edits += token_edits;
    out = tokens.join(" ");

    let (capitalized, cap_edits) = capitalize_sentences(&out);
    edits += cap_edits;
    out = capitalized;

    if out.chars().last().is_some_and(char::is_alphanumeric) {
        out.push('.');
        edits += 1;
    }

    Correction { text: out, edits }
}

fn bare(token: &str) -> &str {
    token.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
}

/// Duplicate words, standalone "i" and a/an agreement, in one pass over
/// whitespace tokens.
fn fix_tokens(tokens: Vec<&str>) -> (Vec<String>, usize) {
    let mut edits = 0;
    let mut out: Vec<String> = Vec::with_capacity(tokens.len());

    for (index, token) in tokens.iter().enumerate() {
        if let Some(previous) = out.last() {
            let prev_is_plain = previous.chars().all(|c| c.is_alphanumeric() || c == '\'');
            let prev_bare = previous.to_lowercase();
            let this_bare = bare(token).to_lowercase();
            if prev_is_plain
                && !this_bare.is_empty()
                && prev_bare == this_bare
                && !ALLOWED_REPEATS.contains(&this_bare.as_str())
                && this_bare.chars().all(char::is_alphabetic)
            {
                // Keep the trailing punctuation of the dropped duplicate.
                let tail_start = token.trim_end_matches(|c: char| !c.is_alphanumeric()).len();
                let tail = &token[tail_start..];
                if let Some(last) = out.last_mut() {
                    last.push_str(tail);
                }
                edits += 1;
                continue;
            }
        }

        let mut fixed = (*token).to_string();

        let core = bare(token);
        if core == "i" || core.starts_with("i'") {
            fixed = fixed.replacen('i', "I", 1);
        }

        if let Some(next) = tokens.get(index + 1)
            && let Some(article) = article_fix(token, next)
        {
            fixed = article;
        }

        if fixed != *token {
            edits += 1;
        }
        out.push(fixed);
    }
    (out, edits)
}

fn article_fix(token: &str, next: &str) -> Option<String> {
    let lower = token.to_lowercase();
    if lower != "a" && lower != "an" {
        return None;
    }
    let next_word = next.trim_start_matches(|c: char| !c.is_alphanumeric());
    if matches!(bare(next_word).to_lowercase().as_str(), "a" | "an") {
        return None;
    }
    let first = next_word.chars().next()?;
    if !first.is_alphabetic() {
        return None;
    }
    // Acronyms are read letter by letter ("an FBI agent", "a UN report").
    let letters: Vec<char> = next_word.chars().take_while(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return None;
    }

    let next_lower = next_word.to_lowercase();
    let vowel_sound = if SILENT_H_PREFIXES.iter().any(|p| next_lower.starts_with(p)) {
        true
    } else if CONSONANT_SOUND_PREFIXES.iter().any(|p| next_lower.starts_with(p)) {
        false
    } else {
        matches!(first.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
    };

    let wanted = if vowel_sound { "an" } else { "a" };
    (lower != wanted).then(|| match_case(token, wanted))
}

fn capitalize_sentences(text: &str) -> (String, usize) {
    let mut edits = 0;
    let sentences: Vec<String> = split_sentences(text)
        .into_iter()
        .map(|sentence| {
            let first_word = sentence.split_whitespace().next().unwrap_or_default();
            // Leave deliberate lowercase brands ("iPhone", "eBay") alone.
            let mixed_case = first_word.chars().skip(1).any(char::is_uppercase);
            let starts_lower = sentence
                .chars()
                .find(|c| c.is_alphanumeric())
                .is_some_and(char::is_lowercase);
            if starts_lower && !mixed_case {
                edits += 1;
                capitalize_first(&sentence)
            } else {
                sentence
            }
        })
        .collect();
    (sentences.join(" "), edits)
}

/// Local engine; always succeeds.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleBasedCorrector;

impl TextTransformer for RuleBasedCorrector {
    fn name(&self) -> &str {
        "rules"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            let correction = correct(&input.text);
            Ok(corrected_result(correction))
        })
    }
}

/// Remote engine backed by a LanguageTool server.
pub struct LanguageToolCorrector {
    client: LanguageToolClient,
}

impl LanguageToolCorrector {
    pub fn new(client: LanguageToolClient) -> Self {
        Self { client }
    }
}

impl TextTransformer for LanguageToolCorrector {
    fn name(&self) -> &str {
        "languagetool"
    }

    fn transform<'a>(&'a self, input: &'a StageInput) -> TransformFuture<'a> {
        Box::pin(async move {
            let matches = self.client.check(&input.text).await?;
            let (text, edits) = apply_matches(&input.text, &matches);
            if text.trim().is_empty() {
                return Err(ProviderError::rejected(
                    "languagetool",
                    "corrections produced empty text",
                ));
            }
            Ok(corrected_result(Correction { text, edits }))
        })
    }
}

fn corrected_result(correction: Correction) -> StageResult {
    let words = word_count(&correction.text);
    StageResult::new(
        correction.text,
        grammar_score(correction.edits, words),
    )
    .with_meta(META_EDITS_COUNT, correction.edits)
    .with_meta("word_count", words)
}
