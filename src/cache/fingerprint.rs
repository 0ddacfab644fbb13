use crate::pipeline::Stage;
use crate::text::normalize_whitespace;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

const SEPARATOR: [u8; 1] = [0x1f];

/// Cache key for one stage invocation: `{prefix}:{stage}:{sha256 hex}`.
///
/// The digest covers the stage name, the whitespace-normalised text and the
/// options map serialised as JSON. `BTreeMap` keeps the option order
/// canonical, so equal inputs always produce equal keys.
pub fn fingerprint(
    prefix: &str,
    stage: Stage,
    text: &str,
    options: &BTreeMap<String, String>,
) -> String {
    let canonical_options = serde_json::to_string(options).unwrap_or_default();

    let mut hasher = Sha256::new();
    hasher.update(stage.as_ref().as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(normalize_whitespace(text).as_bytes());
    hasher.update(SEPARATOR);
    hasher.update(canonical_options.as_bytes());

    format!("{prefix}:{stage}:{}", hex::encode(hasher.finalize()))
}
