use super::traits::{Observer, ObserverEvent, ObserverMetric};
use tracing::{debug, info, warn};

/// Log-based observer: uses tracing, zero external deps
pub struct LogObserver;

impl LogObserver {
    pub fn new() -> Self {
        Self
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

impl Observer for LogObserver {
    fn record_event(&self, event: &ObserverEvent) {
        match event {
            ObserverEvent::StageCompleted {
                stage,
                engine,
                duration,
                cache_hit,
                degraded,
            } => {
                info!(
                    stage = %stage,
                    engine = %engine,
                    duration_ms = millis(*duration),
                    cache_hit,
                    degraded,
                    "stage.completed"
                );
            }
            ObserverEvent::EngineFallback {
                stage,
                engine,
                reason,
            } => {
                warn!(stage = %stage, engine = %engine, reason = %reason, "stage.fallback");
            }
            ObserverEvent::CacheUnavailable { operation, message } => {
                warn!(operation, error = %message, "cache.unavailable");
            }
            ObserverEvent::StateChanged { request_id, state } => {
                debug!(request_id = %request_id, state, "conversion.state");
            }
            ObserverEvent::ConversionCompleted {
                duration,
                confidence,
            } => {
                info!(
                    duration_ms = millis(*duration),
                    confidence, "conversion.completed"
                );
            }
            ObserverEvent::Error { component, message } => {
                warn!(component = %component, error = %message, "error");
            }
        }
    }

    fn record_metric(&self, metric: &ObserverMetric) {
        match metric {
            ObserverMetric::RequestLatency(d) => {
                info!(latency_ms = millis(*d), "metric.request_latency");
            }
            ObserverMetric::CacheHit { stage } => {
                info!(stage = %stage, "metric.cache_hit");
            }
            ObserverMetric::CacheMiss { stage } => {
                info!(stage = %stage, "metric.cache_miss");
            }
            ObserverMetric::InFlightRequests(n) => {
                info!(in_flight = n, "metric.in_flight_requests");
            }
        }
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Stage;
    use std::time::Duration;

    #[test]
    fn log_observer_name() {
        assert_eq!(LogObserver::new().name(), "log");
    }

    #[test]
    fn log_observer_handles_every_event() {
        let obs = LogObserver::new();
        obs.record_event(&ObserverEvent::StageCompleted {
            stage: Stage::Detection,
            engine: "heuristic".into(),
            duration: Duration::from_millis(1),
            cache_hit: true,
            degraded: false,
        });
        obs.record_event(&ObserverEvent::EngineFallback {
            stage: Stage::Grammar,
            engine: "languagetool".into(),
            reason: "timeout".into(),
        });
        obs.record_event(&ObserverEvent::StateChanged {
            request_id: "r-1".into(),
            state: "humanized",
        });
        obs.record_event(&ObserverEvent::ConversionCompleted {
            duration: Duration::from_secs(u64::MAX),
            confidence: 0.8,
        });
        obs.record_event(&ObserverEvent::Error {
            component: "gateway".into(),
            message: "boom".into(),
        });
        obs.record_metric(&ObserverMetric::InFlightRequests(3));
        obs.record_metric(&ObserverMetric::CacheMiss {
            stage: Stage::Plagiarism,
        });
    }
}
