//! Client for the LanguageTool `/check` endpoint.

use super::scrub::{api_error, transport_error};
use crate::config::LanguageToolConfig;
use crate::error::ProviderError;
use reqwest::Client;
use serde::Deserialize;

const PROVIDER: &str = "languagetool";

#[derive(Debug, Deserialize)]
struct CheckResponse {
    #[serde(default)]
    matches: Vec<GrammarMatch>,
}

/// One reported issue. `offset` and `length` count UTF-16 code units.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GrammarMatch {
    pub offset: usize,
    pub length: usize,
    #[serde(default)]
    pub replacements: Vec<Replacement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Replacement {
    pub value: String,
}

pub struct LanguageToolClient {
    base_url: String,
    language: String,
    username: Option<String>,
    api_key: Option<String>,
    client: Client,
}

impl LanguageToolClient {
    pub fn new(config: &LanguageToolConfig, client: Client) -> Self {
        Self {
            base_url: config.resolved_base_url().to_string(),
            language: config.language.clone(),
            username: config.username.clone(),
            api_key: config.api_key.clone(),
            client,
        }
    }

    pub async fn check(&self, text: &str) -> Result<Vec<GrammarMatch>, ProviderError> {
        let mut form: Vec<(&str, &str)> = vec![("text", text), ("language", self.language.as_str())];
        if let Some(username) = &self.username {
            form.push(("username", username.as_str()));
        }
        if let Some(api_key) = &self.api_key {
            form.push(("apiKey", api_key.as_str()));
        }

        let response = self
            .client
            .post(format!("{}/check", self.base_url))
            .form(&form)
            .send()
            .await
            .map_err(|e| transport_error(PROVIDER, &e))?;
        if !response.status().is_success() {
            return Err(api_error(PROVIDER, response).await);
        }

        let body: CheckResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::rejected(PROVIDER, format!("malformed body: {e}")))?;
        Ok(body.matches)
    }
}

/// Byte index for a UTF-16 offset, or `None` when the offset is past the
/// end or inside a surrogate pair.
fn utf16_to_byte(text: &str, utf16_offset: usize) -> Option<usize> {
    let mut units = 0;
    for (byte, c) in text.char_indices() {
        if units == utf16_offset {
            return Some(byte);
        }
        if units > utf16_offset {
            return None;
        }
        units += c.len_utf16();
    }
    (units == utf16_offset).then_some(text.len())
}

/// Apply the first replacement of every match, skipping matches without a
/// suggestion, matches that overlap an earlier one and offsets that split a
/// surrogate pair. Returns the corrected text and the number of edits.
pub fn apply_matches(text: &str, matches: &[GrammarMatch]) -> (String, usize) {
    let mut ordered: Vec<&GrammarMatch> = matches
        .iter()
        .filter(|m| !m.replacements.is_empty())
        .collect();
    ordered.sort_by_key(|m| m.offset);

    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;
    let mut edits = 0;
    for m in ordered {
        let Some(end_offset) = m.offset.checked_add(m.length) else {
            continue;
        };
        let (Some(start), Some(end)) = (
            utf16_to_byte(text, m.offset),
            utf16_to_byte(text, end_offset),
        ) else {
            continue;
        };
        if start < cursor {
            continue;
        }
        let replacement = &m.replacements[0].value;
        if text[start..end] == *replacement {
            continue;
        }
        out.push_str(&text[cursor..start]);
        out.push_str(replacement);
        cursor = end;
        edits += 1;
    }
    out.push_str(&text[cursor..]);
    (out, edits)
}
