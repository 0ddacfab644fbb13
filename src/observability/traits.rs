use std::time::Duration;

use crate::pipeline::Stage;

/// Events the observer can record
#[derive(Debug, Clone)]
pub enum ObserverEvent {
    StageCompleted {
        stage: Stage,
        engine: String,
        duration: Duration,
        cache_hit: bool,
        degraded: bool,
    },
    EngineFallback {
        stage: Stage,
        engine: String,
        reason: String,
    },
    CacheUnavailable {
        operation: &'static str,
        message: String,
    },
    StateChanged {
        request_id: String,
        state: &'static str,
    },
    ConversionCompleted {
        duration: Duration,
        confidence: f64,
    },
    Error {
        component: String,
        message: String,
    },
}

/// Numeric metrics
#[derive(Debug, Clone)]
pub enum ObserverMetric {
    RequestLatency(Duration),
    CacheHit { stage: Stage },
    CacheMiss { stage: Stage },
    InFlightRequests(u64),
}

/// Core observability trait: implement for any backend
pub trait Observer: Send + Sync {
    /// Record a discrete event
    fn record_event(&self, event: &ObserverEvent);

    /// Record a numeric metric
    fn record_metric(&self, metric: &ObserverMetric);

    /// Flush any buffered data (no-op for most backends)
    fn flush(&self) {}

    /// Human-readable name of this observer
    fn name(&self) -> &str;
}
