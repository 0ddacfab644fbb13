//! Deterministic rule-based rewriter.

use super::lexicon::{
    ConnectorKind, EXPANSIONS, FILLERS, KNOWN_CONNECTORS, NEGATION_CONTRACTIONS,
    PRONOUN_CONTRACTIONS, connectors, hedges, is_tone_vocabulary, substitutions,
};
use crate::pipeline::Tone;
use crate::text::sentences::split_terminator;
use crate::text::{
    Chooser, FactualTokens, capitalize_first, match_case, normalize_whitespace, soften_initial,
    split_sentences,
};
use regex::{Captures, Regex};
use std::sync::LazyLock;

const LONG_SENTENCE_WORDS: usize = 24;
const SHORT_SENTENCE_WORDS: usize = 6;
const MIN_SPLIT_PART_WORDS: usize = 6;
const CONNECTOR_CHANCE: f64 = 0.25;
const MERGE_CHANCE: f64 = 0.5;
const HEDGE_CHANCE: f64 = 0.2;
const FILLER_CHANCE: f64 = 0.15;

/// Case-insensitive whole-word alternation, longest entry first.
fn phrase_pattern(entries: &[(&str, &str)]) -> Regex {
    let mut keys: Vec<&str> = entries.iter().map(|(from, _)| *from).collect();
    keys.sort_by_key(|k| std::cmp::Reverse(k.len()));
    let alternatives = keys
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"(?i)\b(?:{alternatives})\b")).expect("static pattern")
}

static FORMAL_WORDS: LazyLock<Regex> = LazyLock::new(|| phrase_pattern(substitutions(Tone::Formal)));
static CASUAL_WORDS: LazyLock<Regex> = LazyLock::new(|| phrase_pattern(substitutions(Tone::Casual)));
static BALANCED_WORDS: LazyLock<Regex> =
    LazyLock::new(|| phrase_pattern(substitutions(Tone::Balanced)));
static NEGATIONS: LazyLock<Regex> = LazyLock::new(|| phrase_pattern(NEGATION_CONTRACTIONS));
static EXPANDABLE: LazyLock<Regex> = LazyLock::new(|| phrase_pattern(EXPANSIONS));
static PRONOUN_PAIRS: LazyLock<Regex> = LazyLock::new(|| {
    let alternatives = PRONOUN_CONTRACTIONS
        .iter()
        .map(|(full, _)| {
            let mut chars = full.chars();
            match chars.next() {
                Some('I') => regex::escape(full),
                Some(first) => format!(
                    "[{}{}]{}",
                    first.to_ascii_uppercase(),
                    first,
                    regex::escape(chars.as_str())
                ),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!(r"\b({alternatives}) (\w)")).expect("static pattern")
});
static SPACE_BEFORE_PUNCT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+([,.!?;:])").expect("static pattern"));
static DOUBLED_COMMA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",(\s*,)+").expect("static pattern"));

fn substitution_pattern(tone: Tone) -> &'static Regex {
    match tone {
        Tone::Formal => &FORMAL_WORDS,
        Tone::Casual => &CASUAL_WORDS,
        Tone::Balanced => &BALANCED_WORDS,
    }
}

fn lookup<'a>(table: &'a [(&'a str, &'a str)], found: &str) -> Option<&'a str> {
    let lower = found.to_lowercase();
    table
        .iter()
        .find(|(from, _)| from.to_lowercase() == lower)
        .map(|(_, to)| *to)
}

/// Swap tone vocabulary. Only lowercase words, or the sentence's opening
/// word, are touched, so names and acronyms survive.
fn substitute(sentence: &str, tone: Tone) -> String {
    let opening = sentence.find(char::is_alphabetic).unwrap_or(0);
    let table = substitutions(tone);
    let replaced = substitution_pattern(tone).replace_all(sentence, |caps: &Captures<'_>| {
        let Some(found) = caps.get(0) else {
            return String::new();
        };
        let text = found.as_str();
        let plain = text.chars().all(|c| !c.is_uppercase());
        let opening_word =
            found.start() == opening && text.chars().skip(1).all(|c| !c.is_uppercase());
        match lookup(table, text) {
            Some(to) if plain || opening_word => match_case(text, to),
            _ => text.to_string(),
        }
    });
    let replaced = normalize_whitespace(&replaced);
    // Dropping a lead-in phrase can leave a lowercase start.
    if opening == 0 || replaced.len() < sentence.len() {
        capitalize_first(&replaced)
    } else {
        replaced
    }
}

fn swap_table(re: &Regex, table: &[(&str, &str)], text: &str) -> String {
    re.replace_all(text, |caps: &Captures<'_>| {
        let found = &caps[0];
        lookup(table, found).map_or_else(|| found.to_string(), |to| match_case(found, to))
    })
    .into_owned()
}

fn apply_contractions(sentence: &str, tone: Tone) -> String {
    match tone {
        Tone::Formal => swap_table(&EXPANDABLE, EXPANSIONS, sentence),
        Tone::Balanced => swap_table(&NEGATIONS, NEGATION_CONTRACTIONS, sentence),
        Tone::Casual => {
            let negated = swap_table(&NEGATIONS, NEGATION_CONTRACTIONS, sentence);
            PRONOUN_PAIRS
                .replace_all(&negated, |caps: &Captures<'_>| {
                    let pair = &caps[1];
                    let short = lookup(PRONOUN_CONTRACTIONS, pair)
                        .map_or_else(|| pair.to_string(), |to| match_case(pair, to));
                    format!("{short} {}", &caps[2])
                })
                .into_owned()
        }
    }
}

/// Split an opening connector (which must be followed by a comma) from
/// the rest of the sentence.
fn leading_connector(sentence: &str) -> Option<(ConnectorKind, &str)> {
    KNOWN_CONNECTORS.iter().find_map(|(phrase, kind)| {
        let head = sentence.get(..phrase.len())?;
        let after = sentence.get(phrase.len()..)?;
        (head.eq_ignore_ascii_case(phrase) && after.starts_with(','))
            .then(|| (*kind, after[1..].trim_start()))
    })
}

fn join_connector(connector: &str, rest: &str) -> String {
    format!("{connector} {}", soften_initial(rest))
}

fn word_len(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Break sentences over `LONG_SENTENCE_WORDS` words at the clause boundary
/// closest to the middle.
fn split_long(sentence: &str) -> Vec<String> {
    if word_len(sentence) <= LONG_SENTENCE_WORDS {
        return vec![sentence.to_string()];
    }
    let (body, terminator) = split_terminator(sentence);
    let middle = body.len() / 2;

    let best = [", and ", "; ", ", but "]
        .iter()
        .flat_map(|marker| body.match_indices(marker).map(move |(at, m)| (at, m.len(), *marker)))
        .filter(|(at, len, _)| {
            word_len(&body[..*at]) >= MIN_SPLIT_PART_WORDS
                && word_len(&body[at + len..]) >= MIN_SPLIT_PART_WORDS
        })
        .min_by_key(|(at, _, _)| at.abs_diff(middle));

    let Some((at, len, marker)) = best else {
        return vec![sentence.to_string()];
    };
    let first = format!("{}.", &body[..at]);
    let rest = &body[at + len..];
    let second = if marker == ", but " {
        format!("But {}{terminator}", soften_initial(rest))
    } else {
        format!("{}{terminator}", capitalize_first(rest))
    };
    let second = if terminator.is_empty() {
        format!("{second}.")
    } else {
        second
    };
    vec![first, second]
}

/// Join pairs of short sentences with ", and".
fn merge_short(sentences: Vec<String>, tone: Tone) -> Vec<String> {
    let mut merged = Vec::with_capacity(sentences.len());
    let mut iter = sentences.into_iter().peekable();
    while let Some(current) = iter.next() {
        let Some(next) = iter.peek() else {
            merged.push(current);
            break;
        };
        let (body, terminator) = split_terminator(&current);
        let mergeable = terminator == "."
            && word_len(&current) < SHORT_SENTENCE_WORDS
            && word_len(next) < SHORT_SENTENCE_WORDS
            && leading_connector(next).is_none()
            && !body.ends_with(',');
        let merge = mergeable
            && Chooser::new(&[tone.as_ref(), current.as_str(), next.as_str()]).chance(MERGE_CHANCE);
        if merge {
            let joined = format!("{body}, and {}", soften_initial(next));
            iter.next();
            merged.push(joined);
        } else {
            merged.push(current);
        }
    }
    merged
}

fn post_process(sentences: &[String]) -> String {
    let joined = sentences
        .iter()
        .map(|s| capitalize_first(s.trim()))
        .collect::<Vec<_>>()
        .join(" ");
    let text = normalize_whitespace(&joined);
    let text = SPACE_BEFORE_PUNCT.replace_all(&text, "$1");
    let text = DOUBLED_COMMA.replace_all(&text, ",");
    capitalize_first(&text)
}

/// Rewrite `text` in the requested tone. Identical inputs always give
/// identical output.
pub fn rewrite(text: &str, tone: Tone, preserve_meaning: bool) -> String {
    let sentences: Vec<String> = split_sentences(text)
        .iter()
        .flat_map(|s| split_long(s))
        .collect();

    let mut rewritten = Vec::with_capacity(sentences.len());
    let mut previous_had_connector = false;
    for (index, sentence) in sentences.iter().enumerate() {
        let position = index.to_string();
        let mut chooser = Chooser::new(&[tone.as_ref(), sentence.as_str(), position.as_str()]);

        let mut current = apply_contractions(&substitute(sentence, tone), tone);
        let mut has_connector = false;

        if let Some((kind, rest)) = leading_connector(&current) {
            if let Some(connector) = chooser.pick(connectors(tone, kind)) {
                current = join_connector(connector, rest);
            }
            has_connector = true;
        } else if index > 0
            && !previous_had_connector
            && word_len(&current) >= 4
            && chooser.chance(CONNECTOR_CHANCE)
            && let Some(connector) = chooser.pick(connectors(tone, ConnectorKind::Addition))
        {
            current = join_connector(connector, &current);
            has_connector = true;
        }

        if !preserve_meaning && !has_connector {
            if chooser.chance(HEDGE_CHANCE)
                && let Some(hedge) = chooser.pick(hedges(tone))
            {
                current = join_connector(hedge, &current);
            } else if tone == Tone::Casual
                && chooser.chance(FILLER_CHANCE)
                && let Some(filler) = chooser.pick(FILLERS)
            {
                current = join_connector(filler, &current);
            }
        }

        previous_had_connector = has_connector;
        rewritten.push(current);
    }

    if tone != Tone::Formal {
        rewritten = merge_short(rewritten, tone);
    }
    let output = post_process(&rewritten);

    if preserve_meaning {
        let facts = FactualTokens::extract_with(text, is_tone_vocabulary);
        let missing = facts.missing_from(&output);
        if !missing.is_empty() {
            tracing::warn!(?missing, "Rewrite dropped factual tokens, keeping original wording");
            return post_process(&split_sentences(text));
        }
    }
    output
}
