use crate::error::ProviderError;
use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Key prefixes used by the vendors we talk to.
const PREFIX_PATTERNS: [&str; 3] = ["sk-", "gz_", "orig_"];

/// Header, query and JSON spellings that precede a credential.
const MARKER_PATTERNS: [&str; 9] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "Bearer ",
    "X-API-KEY: ",
    "x-api-key: ",
    "api_key=",
    "apiKey=",
    "\"api_key\":\"",
    "\"apiKey\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ':' | '+' | '/' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    input[from..]
        .char_indices()
        .find(|(_, c)| !is_secret_char(*c))
        .map_or(input.len(), |(i, _)| from + i)
}

fn redact_after(scrubbed: &mut String, marker: &str) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let value_start = start + marker.len();
        let end = token_end(scrubbed, value_start);
        if end == value_start {
            search_from = value_start;
            continue;
        }
        scrubbed.replace_range(start..end, REDACTED);
        search_from = start + REDACTED.len();
    }
}

/// Redact credential-looking tokens from provider output before it is logged.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let suspicious = PREFIX_PATTERNS
        .iter()
        .chain(MARKER_PATTERNS.iter())
        .any(|pattern| input.contains(pattern));
    if !suspicious {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for marker in MARKER_PATTERNS {
        redact_after(&mut scrubbed, marker);
    }
    for prefix in PREFIX_PATTERNS {
        redact_after(&mut scrubbed, prefix);
    }
    Cow::Owned(scrubbed)
}

/// Scrub secrets and cap the length of an error body.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);
    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }
    let truncated: String = scrubbed.chars().take(MAX_API_ERROR_CHARS).collect();
    format!("{truncated}...")
}

/// Turn a non-success HTTP response into a [`ProviderError`] carrying the
/// status and a sanitized body.
pub async fn api_error(provider: &str, response: reqwest::Response) -> ProviderError {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "<failed to read provider error body>".to_string());
    ProviderError::Unavailable {
        provider: provider.to_string(),
        message: format!("HTTP {status}: {}", sanitize_api_error(&body)),
        status: Some(status.as_u16()),
    }
}

/// Map a transport-level failure (connect, timeout, decode) to a
/// [`ProviderError`].
pub fn transport_error(provider: &str, err: &reqwest::Error) -> ProviderError {
    let message = sanitize_api_error(&err.to_string());
    if err.is_timeout() {
        tracing::debug!(provider, "Provider request timed out: {message}");
    }
    ProviderError::Unavailable {
        provider: provider.to_string(),
        message,
        status: err.status().map(|s| s.as_u16()),
    }
}
