mod cache;
mod core;
mod gateway;
mod observability;
mod providers;

pub use cache::{CacheBackend, CacheConfig};
pub use core::{Config, PipelineConfig, ReliabilityConfig};
pub use gateway::GatewayConfig;
pub use observability::ObservabilityConfig;
pub use providers::{
    DetectionProvidersConfig, EndpointConfig, LanguageToolConfig, PlagiarismProvidersConfig,
    ProvidersConfig, RewriteConfig,
};
