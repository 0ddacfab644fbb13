//! HTTP clients for the external engines behind each stage.

pub mod http_client;
pub mod languagetool;
pub mod rewrite;
pub mod scoring;
pub mod scrub;

pub use http_client::build_engine_client;
pub use languagetool::{GrammarMatch, LanguageToolClient, apply_matches};
pub use rewrite::RewriteClient;
pub use scoring::{EnsembleScore, EnsembleScorer, HttpScorer, ScoringApi, weighted_mean};
pub use scrub::{sanitize_api_error, scrub_secret_patterns};
