//! Word lists behind tone-conditioned rewriting.

use crate::pipeline::Tone;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// The role a sentence-opening connector plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectorKind {
    Addition,
    Contrast,
    Conclusion,
}

/// Openers recognised on input, whatever the requested tone.
pub const KNOWN_CONNECTORS: &[(&str, ConnectorKind)] = &[
    ("in addition", ConnectorKind::Addition),
    ("additionally", ConnectorKind::Addition),
    ("furthermore", ConnectorKind::Addition),
    ("moreover", ConnectorKind::Addition),
    ("what's more", ConnectorKind::Addition),
    ("on top of that", ConnectorKind::Addition),
    ("beyond that", ConnectorKind::Addition),
    ("also", ConnectorKind::Addition),
    ("plus", ConnectorKind::Addition),
    ("notably", ConnectorKind::Addition),
    ("on the other hand", ConnectorKind::Contrast),
    ("on the flip side", ConnectorKind::Contrast),
    ("at the same time", ConnectorKind::Contrast),
    ("nevertheless", ConnectorKind::Contrast),
    ("nonetheless", ConnectorKind::Contrast),
    ("in contrast", ConnectorKind::Contrast),
    ("conversely", ConnectorKind::Contrast),
    ("despite this", ConnectorKind::Contrast),
    ("that said", ConnectorKind::Contrast),
    ("however", ConnectorKind::Contrast),
    ("still", ConnectorKind::Contrast),
    ("in conclusion", ConnectorKind::Conclusion),
    ("to summarize", ConnectorKind::Conclusion),
    ("in summary", ConnectorKind::Conclusion),
    ("as a result", ConnectorKind::Conclusion),
    ("consequently", ConnectorKind::Conclusion),
    ("all in all", ConnectorKind::Conclusion),
    ("in the end", ConnectorKind::Conclusion),
    ("therefore", ConnectorKind::Conclusion),
    ("overall", ConnectorKind::Conclusion),
    ("thus", ConnectorKind::Conclusion),
    ("hence", ConnectorKind::Conclusion),
];

pub fn connectors(tone: Tone, kind: ConnectorKind) -> &'static [&'static str] {
    use ConnectorKind::{Addition, Conclusion, Contrast};
    match (tone, kind) {
        (Tone::Formal, Addition) => &["Furthermore,", "Moreover,", "In addition,", "Notably,"],
        (Tone::Formal, Contrast) => &["However,", "Nevertheless,", "In contrast,", "Conversely,"],
        (Tone::Formal, Conclusion) => &["Therefore,", "Consequently,", "Accordingly,", "In summary,"],
        (Tone::Casual, Addition) => &["Also,", "Plus,", "On top of that,", "What's more,"],
        (Tone::Casual, Contrast) => &["But", "Still,", "That said,", "Then again,"],
        (Tone::Casual, Conclusion) => &["So", "In the end,", "Bottom line,", "All in all,"],
        (Tone::Balanced, Addition) => &["Also,", "Plus,", "Beyond that,", "On top of that,"],
        (Tone::Balanced, Contrast) => &["But", "That said,", "Still,", "At the same time,"],
        (Tone::Balanced, Conclusion) => &["So", "In the end,", "All in all,", "Because of this,"],
    }
}

/// Single words and fixed phrases swapped for a tone. Matching is
/// case-insensitive on whole words; longer entries win.
pub fn substitutions(tone: Tone) -> &'static [(&'static str, &'static str)] {
    match tone {
        Tone::Formal => FORMAL_SUBSTITUTIONS,
        Tone::Casual => CASUAL_SUBSTITUTIONS,
        Tone::Balanced => BALANCED_SUBSTITUTIONS,
    }
}

const FORMAL_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("a lot of", "a great deal of"),
    ("lots of", "numerous"),
    ("pretty much", "largely"),
    ("kind of", "somewhat"),
    ("sort of", "somewhat"),
    ("a bit", "slightly"),
    ("totally", "entirely"),
    ("really", "truly"),
    ("maybe", "perhaps"),
    ("huge", "considerable"),
    ("big", "substantial"),
    ("kids", "children"),
    ("buy", "purchase"),
];

const BALANCED_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("it is important to note that", ""),
    ("it is worth noting that", ""),
    ("due to the fact that", "because"),
    ("at this point in time", "now"),
    ("a large number of", "many"),
    ("in order to", "to"),
    ("revolutionized", "transformed"),
    ("revolutionize", "transform"),
    ("utilization", "use"),
    ("utilize", "use"),
    ("utilizes", "uses"),
    ("utilized", "used"),
    ("utilizing", "using"),
    ("various", "many"),
    ("numerous", "many"),
    ("facilitate", "help"),
    ("facilitates", "helps"),
    ("leverage", "use"),
    ("leverages", "uses"),
    ("demonstrate", "show"),
    ("demonstrates", "shows"),
    ("commence", "start"),
    ("subsequently", "later"),
    ("approximately", "about"),
    ("endeavor", "effort"),
];

const CASUAL_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("it is important to note that", ""),
    ("it is worth noting that", ""),
    ("due to the fact that", "because"),
    ("at this point in time", "now"),
    ("a large number of", "lots of"),
    ("in order to", "to"),
    ("revolutionized", "shaken up"),
    ("revolutionize", "shake up"),
    ("utilization", "use"),
    ("utilize", "use"),
    ("utilizes", "uses"),
    ("utilized", "used"),
    ("utilizing", "using"),
    ("various", "all kinds of"),
    ("numerous", "lots of"),
    ("facilitate", "help"),
    ("facilitates", "helps"),
    ("leverage", "use"),
    ("leverages", "uses"),
    ("demonstrate", "show"),
    ("demonstrates", "shows"),
    ("commence", "start"),
    ("subsequently", "later"),
    ("approximately", "about"),
    ("purchase", "buy"),
    ("obtain", "get"),
    ("assist", "help"),
    ("require", "need"),
    ("requires", "needs"),
    ("sufficient", "enough"),
    ("children", "kids"),
    ("perhaps", "maybe"),
    ("very", "really"),
];

/// Negations contracted for casual and balanced output.
pub const NEGATION_CONTRACTIONS: &[(&str, &str)] = &[
    ("cannot", "can't"),
    ("can not", "can't"),
    ("do not", "don't"),
    ("does not", "doesn't"),
    ("did not", "didn't"),
    ("is not", "isn't"),
    ("are not", "aren't"),
    ("was not", "wasn't"),
    ("were not", "weren't"),
    ("will not", "won't"),
    ("would not", "wouldn't"),
    ("could not", "couldn't"),
    ("should not", "shouldn't"),
    ("has not", "hasn't"),
    ("have not", "haven't"),
];

/// Pronoun contractions used only by the casual tone. They apply only when
/// another word follows, so "as it is." stays intact.
pub const PRONOUN_CONTRACTIONS: &[(&str, &str)] = &[
    ("it is", "it's"),
    ("that is", "that's"),
    ("there is", "there's"),
    ("we are", "we're"),
    ("they are", "they're"),
    ("you are", "you're"),
    ("I am", "I'm"),
    ("we will", "we'll"),
    ("they will", "they'll"),
    ("let us", "let's"),
];

/// Contractions expanded by the formal tone.
pub const EXPANSIONS: &[(&str, &str)] = &[
    ("can't", "cannot"),
    ("won't", "will not"),
    ("don't", "do not"),
    ("doesn't", "does not"),
    ("didn't", "did not"),
    ("isn't", "is not"),
    ("aren't", "are not"),
    ("wasn't", "was not"),
    ("weren't", "were not"),
    ("wouldn't", "would not"),
    ("couldn't", "could not"),
    ("shouldn't", "should not"),
    ("hasn't", "has not"),
    ("haven't", "have not"),
    ("it's", "it is"),
    ("that's", "that is"),
    ("there's", "there is"),
    ("we're", "we are"),
    ("they're", "they are"),
    ("you're", "you are"),
    ("I'm", "I am"),
    ("we'll", "we will"),
    ("they'll", "they will"),
    ("let's", "let us"),
];

/// Sentence openers that soften a claim; only used when the caller allows
/// rewording beyond meaning-preserving edits.
pub fn hedges(tone: Tone) -> &'static [&'static str] {
    match tone {
        Tone::Formal => &["Arguably,", "In many cases,", "It appears that"],
        Tone::Casual => &["Honestly,", "I think", "Pretty much,"],
        Tone::Balanced => &["Probably,", "In most cases,", "It seems like"],
    }
}

/// Casual fillers, same restriction as hedges.
pub const FILLERS: &[&str] = &["You know,", "Basically,", "Actually,", "Well,"];

/// Stock phrases typical of machine-generated prose.
pub const AI_STOCK_PHRASES: &[&str] = &[
    "it is important to",
    "furthermore",
    "moreover",
    "additionally",
    "in conclusion",
    "to summarize",
    "overall",
    "therefore",
    "as a result",
    "consequently",
    "thus",
    "hence",
];

/// Spoken-register markers that count towards the humanization score.
pub const CONVERSATIONAL_MARKERS: &[&str] = &[
    "kind of", "sort of", "a bit", "pretty much", "you know", "i think", "honestly", "actually",
    "basically", "maybe", "probably",
];

static VOCABULARY: LazyLock<BTreeSet<String>> = LazyLock::new(|| {
    let tones = [Tone::Formal, Tone::Casual, Tone::Balanced];
    let kinds = [
        ConnectorKind::Addition,
        ConnectorKind::Contrast,
        ConnectorKind::Conclusion,
    ];
    let mut phrases: Vec<&str> = KNOWN_CONNECTORS.iter().map(|(phrase, _)| *phrase).collect();
    phrases.extend(FILLERS);
    for tone in tones {
        phrases.extend(substitutions(tone).iter().flat_map(|(from, to)| [*from, *to]));
        phrases.extend(hedges(tone));
        for kind in kinds {
            phrases.extend(connectors(tone, kind));
        }
    }
    for table in [NEGATION_CONTRACTIONS, PRONOUN_CONTRACTIONS, EXPANSIONS] {
        phrases.extend(table.iter().flat_map(|(from, to)| [*from, *to]));
    }
    phrases
        .iter()
        .flat_map(|phrase| phrase.split_whitespace())
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase())
        .filter(|word| !word.is_empty())
        .collect()
});

/// Whether a lowercase word belongs to the rewriting vocabulary, so a
/// sentence opener made of it is an ordinary word rather than a name.
pub fn is_tone_vocabulary(word: &str) -> bool {
    VOCABULARY.contains(word)
}
