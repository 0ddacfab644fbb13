//! Shared text helpers used by every stage: tokenising, sentence splitting,
//! factual-token extraction and the seeded chooser behind deterministic
//! rewrites.

pub mod choice;
pub mod facts;
pub mod sentences;

pub use choice::Chooser;
pub use facts::FactualTokens;
pub use sentences::split_sentences;

/// Small closed-class words. Used for function-word ratios and to decide
/// whether a sentence-initial word may be lowercased safely.
pub const FUNCTION_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "for", "from", "in", "is", "it", "its", "of", "on",
    "or", "that", "the", "their", "there", "these", "they", "this", "those", "to", "was", "we",
    "were", "which", "with", "you",
];

/// Collapse every whitespace run into a single space and trim both ends.
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercased word tokens with surrounding punctuation stripped. Inner
/// apostrophes and hyphens survive (`don't`, `well-known`).
pub fn words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter_map(|raw| {
            let trimmed =
                raw.trim_matches(|c: char| !c.is_alphanumeric() && c != '\'' && c != '-');
            let trimmed = trimmed.trim_matches(|c: char| c == '\'' || c == '-');
            (!trimmed.is_empty()).then(|| trimmed.to_lowercase())
        })
        .collect()
}

pub fn word_count(text: &str) -> usize {
    words(text).len()
}

/// How many of `phrases` occur in `text` as whole words (each phrase counts
/// once). Phrases must be lowercase.
pub fn count_phrases(text: &str, phrases: &[&str]) -> usize {
    let padded = format!(" {} ", words(text).join(" "));
    phrases
        .iter()
        .filter(|phrase| padded.contains(&format!(" {phrase} ")))
        .count()
}

/// Uppercase the first alphabetic character, leaving everything else alone.
pub fn capitalize_first(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut done = false;
    for c in text.chars() {
        if !done && c.is_alphabetic() {
            out.extend(c.to_uppercase());
            done = true;
        } else {
            out.push(c);
        }
    }
    out
}

/// Lowercase the first character only when the opening word is a function
/// word, so proper nouns, acronyms and "I" keep their case.
pub fn soften_initial(sentence: &str) -> String {
    let first = sentence.split_whitespace().next().unwrap_or_default();
    let bare = first.trim_matches(|c: char| !c.is_alphanumeric());
    let lower = bare.to_lowercase();
    let is_plain = bare.chars().skip(1).all(char::is_lowercase);
    if is_plain && FUNCTION_WORDS.contains(&lower.as_str()) {
        let mut chars = sentence.chars();
        match chars.next() {
            Some(c) => c.to_lowercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        sentence.to_string()
    }
}

/// Match the capitalisation of `template` onto `replacement`: all-caps stays
/// all-caps, a leading capital is carried over.
pub fn match_case(template: &str, replacement: &str) -> String {
    let letters: Vec<char> = template.chars().filter(|c| c.is_alphabetic()).collect();
    if letters.len() > 1 && letters.iter().all(|c| c.is_uppercase()) {
        return replacement.to_uppercase();
    }
    if template.chars().next().is_some_and(char::is_uppercase) {
        return capitalize_first(replacement);
    }
    replacement.to_string()
}
