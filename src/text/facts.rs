use std::collections::{BTreeMap, BTreeSet};

use super::FUNCTION_WORDS;
use super::sentences::split_sentences;

/// Ordinary words that open sentences. A capitalised sentence-initial word
/// outside this list is taken as a name.
const COMMON_STARTERS: &[&str] = &[
    "after", "again", "all", "although", "another", "any", "are", "because", "before", "both",
    "can", "could", "do", "does", "each", "even", "every", "first", "finally", "he", "her",
    "here", "his", "how", "however", "i", "if", "instead", "just", "last", "many", "more",
    "most", "much", "my", "next", "no", "not", "now", "once", "one", "only", "other", "our",
    "perhaps", "please", "second", "she", "since", "so", "some", "such", "then", "though",
    "today", "what", "when", "where", "whether", "while", "who", "why", "will", "yes", "yet",
    "your",
];

const CONTRACTION_SUFFIXES: &[&str] = &["n't", "'re", "'ll", "'m", "'ve", "'d"];

/// Tokens a meaning-preserving rewrite must never change: anything carrying
/// a digit, acronyms, capitalised words inside a sentence, and capitalised
/// sentence openers that are not ordinary words (named entities).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FactualTokens {
    counts: BTreeMap<String, usize>,
}

impl FactualTokens {
    pub fn extract(text: &str) -> Self {
        Self::extract_with(text, |_| false)
    }

    /// Like [`extract`](Self::extract), but sentence openers for which
    /// `is_vocabulary` holds (lowercased) are treated as ordinary words.
    pub fn extract_with(text: &str, is_vocabulary: impl Fn(&str) -> bool) -> Self {
        let lowercase_elsewhere: BTreeSet<&str> = text
            .split_whitespace()
            .map(|raw| raw.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|token| token.chars().next().is_some_and(char::is_lowercase))
            .collect();
        let ordinary_opener = |token: &str| {
            let lower = token.to_lowercase().replace('\u{2019}', "'");
            if CONTRACTION_SUFFIXES
                .iter()
                .any(|suffix| lower.ends_with(suffix))
            {
                return true;
            }
            let lower = lower.strip_suffix("'s").unwrap_or(&lower);
            FUNCTION_WORDS.contains(&lower)
                || COMMON_STARTERS.contains(&lower)
                || lowercase_elsewhere.contains(lower)
                || is_vocabulary(lower)
        };

        let mut counts = BTreeMap::new();
        for sentence in split_sentences(text) {
            for (position, raw) in sentence.split_whitespace().enumerate() {
                let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
                if token.is_empty() {
                    continue;
                }
                let has_digit = token.chars().any(|c| c.is_ascii_digit());
                let capitalised = token.chars().next().is_some_and(char::is_uppercase);
                let acronym = token.chars().filter(|c| c.is_alphabetic()).count() > 1
                    && token
                        .chars()
                        .filter(|c| c.is_alphabetic())
                        .all(char::is_uppercase);
                let name = capitalised
                    && token != "I"
                    && (position > 0 || !ordinary_opener(token));
                if has_digit || acronym || name {
                    *counts.entry(token.to_string()).or_insert(0) += 1;
                }
            }
        }
        Self { counts }
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Factual tokens of `self` that `rewritten` lost (or has fewer of).
    pub fn missing_from(&self, rewritten: &str) -> Vec<String> {
        let mut available: BTreeMap<String, usize> = BTreeMap::new();
        for raw in rewritten.split_whitespace() {
            let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
            if !token.is_empty() {
                *available.entry(token.to_string()).or_insert(0) += 1;
            }
        }
        self.counts
            .iter()
            .filter(|(token, count)| available.get(*token).copied().unwrap_or(0) < **count)
            .map(|(token, _)| token.clone())
            .collect()
    }

    pub fn preserved_in(&self, rewritten: &str) -> bool {
        self.missing_from(rewritten).is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_numbers_entities_and_acronyms() {
        let facts = FactualTokens::extract("In 2023 the team at Google shipped 3 NLP models.");
        assert!(facts.missing_from("").contains(&"2023".to_string()));
        assert!(facts.missing_from("").contains(&"Google".to_string()));
        assert!(facts.missing_from("").contains(&"NLP".to_string()));
        assert!(!facts.missing_from("").contains(&"In".to_string()));
    }

    #[test]
    fn preserved_when_all_tokens_survive() {
        let facts = FactualTokens::extract("The revenue grew 12% at Acme last year.");
        assert!(facts.preserved_in("Acme saw revenue grow by 12% last year."));
        assert!(!facts.preserved_in("The revenue grew 15% at Acme last year."));
    }

    #[test]
    fn leading_proper_noun_is_a_fact() {
        let facts = FactualTokens::extract("Google has opened 3 new offices.");
        assert!(!facts.preserved_in("The company has opened 3 new offices."));
        assert_eq!(
            facts.missing_from("The company has opened 3 new offices."),
            vec!["Google"]
        );
        assert!(facts.preserved_in("Google has now opened 3 new offices."));
        assert!(!FactualTokens::extract("Google's offices opened.").is_empty());
    }

    #[test]
    fn ordinary_openers_are_not_facts() {
        let facts = FactualTokens::extract(
            "However, the plan works. Prices rose as prices do. Don't panic. It's fine.",
        );
        assert!(facts.is_empty());
        let vocabulary = FactualTokens::extract_with("Utilize the tool.", |w| w == "utilize");
        assert!(vocabulary.is_empty());
        assert!(!FactualTokens::extract("Utilize the tool.").is_empty());
    }

    #[test]
    fn plain_text_has_no_facts() {
        assert!(FactualTokens::extract("the cat sat on the mat.").is_empty());
    }
}
