pub mod schema;

pub use schema::{
    CacheBackend, CacheConfig, Config, DetectionProvidersConfig, EndpointConfig, GatewayConfig,
    LanguageToolConfig, ObservabilityConfig, PipelineConfig, PlagiarismProvidersConfig,
    ProvidersConfig, ReliabilityConfig, RewriteConfig,
};
