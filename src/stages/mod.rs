//! Stage engines. Each stage has one or more remote engines and a local
//! fallback that always succeeds.

pub mod detection;
pub mod grammar;
pub mod humanize;
pub mod plagiarism;

pub use detection::{AI_DETECTED_THRESHOLD, HeuristicDetector, ProviderDetector};
pub use grammar::{LanguageToolCorrector, RuleBasedCorrector};
pub use humanize::{ModelHumanizer, RuleBasedHumanizer};
pub use plagiarism::{HeuristicPlagiarismChecker, PLAGIARIZED_THRESHOLD, ProviderPlagiarismChecker};
