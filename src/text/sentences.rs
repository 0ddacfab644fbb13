/// Abbreviations that end in a period without ending the sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "vs", "etc", "e.g", "i.e", "inc", "ltd",
    "co", "no", "fig", "approx", "u.s", "u.k",
];

/// Split text into sentences, keeping each sentence's terminal punctuation.
///
/// A boundary is a run of `.`, `!` or `?` (optionally followed by closing
/// quotes or brackets) that is followed by whitespace or the end of input.
/// Decimal points and known abbreviations do not split. Text after the last
/// terminator becomes a final sentence without punctuation.
pub fn split_sentences(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        current.push(c);

        if matches!(c, '.' | '!' | '?') {
            let mut j = i + 1;
            while j < chars.len() && matches!(chars[j], '.' | '!' | '?' | '"' | '\'' | ')' | ']')
            {
                current.push(chars[j]);
                j += 1;
            }
            let at_end = j >= chars.len();
            let followed_by_space = !at_end && chars[j].is_whitespace();

            if (at_end || followed_by_space) && !(c == '.' && ends_with_abbreviation(&current)) {
                let sentence = current.trim().to_string();
                if !sentence.is_empty() {
                    sentences.push(sentence);
                }
                current.clear();
            }
            i = j;
            continue;
        }
        i += 1;
    }

    let rest = current.trim();
    if !rest.is_empty() {
        sentences.push(rest.to_string());
    }
    sentences
}

fn ends_with_abbreviation(fragment: &str) -> bool {
    let last = fragment
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .trim_start_matches(|c: char| !c.is_alphanumeric())
        .trim_end_matches('.')
        .to_lowercase();
    // Single letters are initials ("J. Smith").
    (last.chars().count() == 1 && last.chars().all(char::is_alphabetic))
        || ABBREVIATIONS.contains(&last.as_str())
}

/// The sentence body without its terminal punctuation, and the terminator.
pub fn split_terminator(sentence: &str) -> (&str, &str) {
    let body = sentence.trim_end_matches(['.', '!', '?', '"', '\'', ')', ']']);
    // Keep closing quotes/brackets attached to the body when they precede the
    // terminator.
    let tail = &sentence[body.len()..];
    match tail.find(['.', '!', '?']) {
        Some(pos) => (&sentence[..body.len() + pos], &tail[pos..]),
        None => (sentence, ""),
    }
}
