//! Process-wide health of the pieces a conversion depends on.
//!
//! Components are named by what they are:
//! - `cache`, `gateway`
//! - `stage.<stage>`: ok when the first engine answered, degraded when a
//!   fallback did, error when the input was passed through
//! - `engine.<stage>.<engine>`: last outcome of one engine in a chain
//! - `provider.<stage>.<name>`: last outcome of one remote scoring API
//!
//! `GET /health` reports the snapshot under `runtime`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{LazyLock, Mutex};
use std::time::Instant;

use crate::pipeline::Stage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Ok,
    Degraded,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComponentHealth {
    pub status: Status,
    pub successes: u64,
    pub failures: u64,
    pub last_success: Option<DateTime<Utc>>,
    pub last_failure: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl ComponentHealth {
    fn new(status: Status) -> Self {
        Self {
            status,
            successes: 0,
            failures: 0,
            last_success: None,
            last_failure: None,
            last_error: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthSnapshot {
    pub uptime_seconds: u64,
    /// Components whose last outcome was not `ok`.
    pub unhealthy: Vec<String>,
    pub components: BTreeMap<String, ComponentHealth>,
}

static STARTED_AT: LazyLock<Instant> = LazyLock::new(Instant::now);
static COMPONENTS: LazyLock<Mutex<BTreeMap<String, ComponentHealth>>> =
    LazyLock::new(|| Mutex::new(BTreeMap::new()));

pub fn stage_component(stage: Stage) -> String {
    format!("stage.{stage}")
}

pub fn engine_component(stage: Stage, engine: &str) -> String {
    format!("engine.{stage}.{engine}")
}

pub fn provider_component(stage: Stage, provider: &str) -> String {
    format!("provider.{stage}.{provider}")
}

fn record(component: &str, status: Status, error: Option<String>) {
    LazyLock::force(&STARTED_AT);
    let Ok(mut components) = COMPONENTS.lock() else {
        return;
    };
    let entry = components
        .entry(component.to_string())
        .or_insert_with(|| ComponentHealth::new(status));
    let now = Utc::now();
    entry.status = status;
    match error {
        None => {
            entry.successes = entry.successes.saturating_add(1);
            entry.last_success = Some(now);
            entry.last_error = None;
        }
        Some(error) => {
            entry.failures = entry.failures.saturating_add(1);
            entry.last_failure = Some(now);
            entry.last_error = Some(error);
        }
    }
}

pub fn record_ok(component: &str) {
    record(component, Status::Ok, None);
}

/// Still serving, but through a fallback path.
#[allow(clippy::needless_pass_by_value)]
pub fn record_degraded(component: &str, reason: impl ToString) {
    record(component, Status::Degraded, Some(reason.to_string()));
}

#[allow(clippy::needless_pass_by_value)]
pub fn record_error(component: &str, error: impl ToString) {
    record(component, Status::Error, Some(error.to_string()));
}

pub fn component(name: &str) -> Option<ComponentHealth> {
    COMPONENTS
        .lock()
        .ok()
        .and_then(|components| components.get(name).cloned())
}

pub fn snapshot() -> HealthSnapshot {
    let components = COMPONENTS
        .lock()
        .map(|components| components.clone())
        .unwrap_or_default();
    let unhealthy = components
        .iter()
        .filter(|(_, health)| health.status != Status::Ok)
        .map(|(name, _)| name.clone())
        .collect();
    HealthSnapshot {
        uptime_seconds: STARTED_AT.elapsed().as_secs(),
        unhealthy,
        components,
    }
}

pub fn snapshot_json() -> serde_json::Value {
    serde_json::to_value(snapshot())
        .unwrap_or_else(|e| serde_json::json!({ "error": format!("health snapshot: {e}") }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn component_names_follow_their_kind() {
        assert_eq!(stage_component(Stage::Grammar), "stage.grammar");
        assert_eq!(
            engine_component(Stage::Humanize, "model"),
            "engine.humanize.model"
        );
        assert_eq!(
            provider_component(Stage::Detection, "gptzero"),
            "provider.detection.gptzero"
        );
    }

    #[test]
    fn failures_and_recovery_are_counted() {
        let name = provider_component(Stage::Detection, "health-test-recovery");
        record_error(&name, "HTTP 503");
        record_error(&name, "HTTP 502");
        let failing = component(&name).unwrap();
        assert_eq!(failing.status, Status::Error);
        assert_eq!(failing.failures, 2);
        assert_eq!(failing.last_error.as_deref(), Some("HTTP 502"));
        assert!(snapshot().unhealthy.contains(&name));

        record_ok(&name);
        let recovered = component(&name).unwrap();
        assert_eq!(recovered.status, Status::Ok);
        assert_eq!(recovered.successes, 1);
        assert_eq!(recovered.last_error, None);
        assert!(recovered.last_failure.is_some());
        assert!(!snapshot().unhealthy.contains(&name));
    }

    #[test]
    fn degraded_is_reported_as_lowercase_json() {
        let name = stage_component(Stage::Plagiarism) + ".health-test";
        record_degraded(&name, "served by heuristic");
        let json = snapshot_json();
        assert_eq!(json["components"][&name]["status"], "degraded");
        assert_eq!(json["components"][&name]["failures"], 1);
    }
}
