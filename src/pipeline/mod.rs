//! Stage chaining, caching and the conversion orchestrator.

pub mod cached;
pub mod confidence;
pub mod orchestrator;
pub mod transformer;
mod types;

pub use cached::CachedStage;
pub use confidence::{ConfidenceInputs, confidence};
pub use orchestrator::{ConversionState, Pipeline};
pub use transformer::{PASSTHROUGH_ENGINE, TextTransformer, TransformChain, TransformFuture};
pub use types::*;
