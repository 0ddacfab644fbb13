use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for the humanizer service.
///
/// Only what can reach an HTTP caller. Provider and cache failures are
/// recovered inside the pipeline by fallback engines and always-compute mode,
/// and only show up in logs and stage metadata. Config failures
/// surface at startup through `anyhow`.
#[derive(Debug, Error)]
pub enum HumanizerError {
    // ── Request validation ──────────────────────────────────────────────
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),

    // ── Unexpected faults inside a stage or the orchestrator ────────────
    #[error("internal: {0}")]
    Internal(String),
}

impl HumanizerError {
    /// Whether the error is the caller's fault (maps to a 4xx response).
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

// ─── Validation errors ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("text must not be empty")]
    EmptyText,

    #[error("text is too long ({len} characters, maximum is {max})")]
    TextTooLong { len: usize, max: usize },

    #[error("invalid JSON: {0}")]
    InvalidJson(String),
}

// ─── Provider errors ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("provider {provider} is not configured")]
    NotConfigured { provider: String },

    #[error("provider {provider} unavailable: {message}")]
    Unavailable {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    #[error("provider {provider} timed out after {after_ms}ms")]
    Timeout { provider: String, after_ms: u64 },

    #[error("provider {provider} output rejected: {reason}")]
    Rejected { provider: String, reason: String },
}

impl ProviderError {
    pub fn unavailable(provider: &str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            provider: provider.to_string(),
            message: message.into(),
            status: None,
        }
    }

    pub fn rejected(provider: &str, reason: impl Into<String>) -> Self {
        Self::Rejected {
            provider: provider.to_string(),
            reason: reason.into(),
        }
    }

    /// Client errors (4xx other than 408/429) and rejected output won't
    /// change on retry.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NotConfigured { .. } | Self::Rejected { .. } => false,
            Self::Timeout { .. } => true,
            Self::Unavailable { status, .. } => match status {
                Some(code) => !(400..500).contains(code) || *code == 408 || *code == 429,
                None => true,
            },
        }
    }
}

// ─── Cache errors ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Error)]
pub enum CacheError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("operation timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("serialization: {0}")]
    Serialization(String),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
