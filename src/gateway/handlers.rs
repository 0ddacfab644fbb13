use axum::{
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use futures_util::FutureExt;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use super::AppState;
use crate::diagnostics::health;
use crate::error::{HumanizerError, ValidationError};
use crate::pipeline::ConversionRequest;

/// GET /: service banner
pub(super) async fn handle_root() -> impl IntoResponse {
    Json(json!({
        "message": "AI-to-Human Converter API",
        "status": "active",
    }))
}

/// GET /health: engines per stage, cache counters and component health
pub(super) async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let status = if state.pipeline.cache_healthy() {
        "healthy"
    } else {
        "degraded"
    };
    Json(json!({
        "status": status,
        "services": state.pipeline.services(),
        "cache": state.pipeline.cache_stats(),
        "runtime": health::snapshot_json(),
    }))
}

/// POST /api/grammar
pub(super) async fn handle_grammar(
    State(state): State<AppState>,
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> Response {
    let request = match parse(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let outcome = guarded("grammar", state.pipeline.grammar(&request.text)).await;
    respond(outcome.map(|result| {
        json!({
            "original_text": request.text,
            "corrected_text": result.output_text,
            "edits_count": result.edits_count(),
            "degraded": result.degraded(),
            "status": "success",
        })
    }))
}

/// POST /api/humanize
pub(super) async fn handle_humanize(
    State(state): State<AppState>,
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> Response {
    let request = match parse(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let outcome = guarded(
        "humanize",
        state
            .pipeline
            .humanize(&request.text, request.tone, request.preserve_meaning),
    )
    .await;
    respond(outcome.map(|result| {
        json!({
            "original_text": request.text,
            "humanized_text": result.output_text,
            "humanization_score": result.score,
            "tone": request.tone,
            "status": "success",
        })
    }))
}

/// POST /api/detect
pub(super) async fn handle_detect(
    State(state): State<AppState>,
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> Response {
    let request = match parse(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let outcome = guarded("detection", state.pipeline.detect(&request.text)).await;
    respond(outcome.map(|result| {
        json!({
            "text": request.text,
            "detection_score": result.score,
            "is_ai_detected": flag(&result.metadata, "is_ai_detected"),
            "status": "success",
        })
    }))
}

/// POST /api/plagiarism
pub(super) async fn handle_plagiarism(
    State(state): State<AppState>,
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> Response {
    let request = match parse(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let outcome = guarded("plagiarism", state.pipeline.plagiarism(&request.text)).await;
    respond(outcome.map(|result| {
        json!({
            "text": request.text,
            "plagiarism_score": result.score,
            "is_plagiarized": flag(&result.metadata, "is_plagiarized"),
            "status": "success",
        })
    }))
}

/// POST /api/convert: the full pipeline
pub(super) async fn handle_convert(
    State(state): State<AppState>,
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> Response {
    let request = match parse(body) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let outcome = guarded("convert", state.pipeline.convert(&request)).await;
    respond(outcome.and_then(|response| {
        serde_json::to_value(response)
            .map_err(|e| HumanizerError::Internal(format!("response encoding failed: {e}")))
    }))
}

fn flag(metadata: &BTreeMap<String, Value>, key: &str) -> bool {
    metadata.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn parse(
    body: Result<Json<ConversionRequest>, JsonRejection>,
) -> Result<ConversionRequest, Response> {
    match body {
        Ok(Json(request)) => Ok(request),
        Err(rejection) => {
            let err = ValidationError::InvalidJson(rejection.body_text());
            tracing::debug!("Rejected request body: {err}");
            Err(error_response(&HumanizerError::Validation(err)))
        }
    }
}

/// Run a pipeline call, turning a panic into an internal error.
async fn guarded<T, F>(operation: &str, future: F) -> Result<T, HumanizerError>
where
    F: Future<Output = Result<T, HumanizerError>>,
{
    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(outcome) => outcome,
        Err(_) => Err(HumanizerError::Internal(format!("{operation} panicked"))),
    }
}

fn respond(outcome: Result<Value, HumanizerError>) -> Response {
    match outcome {
        Ok(body) => (StatusCode::OK, Json(body)).into_response(),
        Err(e) => error_response(&e),
    }
}

fn error_response(error: &HumanizerError) -> Response {
    let (status, message) = match error {
        HumanizerError::Validation(ValidationError::InvalidJson(detail)) => {
            (StatusCode::BAD_REQUEST, format!("Invalid JSON: {detail}"))
        }
        HumanizerError::Validation(e) => (StatusCode::BAD_REQUEST, capitalize_message(e)),
        other => {
            tracing::error!("Request failed: {other}");
            health::record_error("gateway", other);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    };
    (status, Json(json!({ "error": message }))).into_response()
}

fn capitalize_message(error: &ValidationError) -> String {
    crate::text::capitalize_first(&error.to_string())
}
