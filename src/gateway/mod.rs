//! Axum HTTP gateway exposing the conversion pipeline.
//!
//! - `GET /`, `GET /health`
//! - `POST /api/grammar`, `/api/humanize`, `/api/detect`, `/api/plagiarism`
//! - `POST /api/convert` for the full pipeline
//!
//! Request bodies are capped (64KB by default) and every request has a
//! timeout (30s by default).

mod handlers;

use handlers::{
    handle_convert, handle_detect, handle_grammar, handle_health, handle_humanize,
    handle_plagiarism, handle_root,
};

use crate::config::{Config, GatewayConfig};
use crate::diagnostics::health;
use crate::pipeline::Pipeline;
use anyhow::{Context, Result};
use axum::{
    Router,
    http::StatusCode,
    routing::{get, post},
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Shared state for all axum handlers
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
}

/// Bind `gateway.host:gateway.port` and serve until the process stops.
pub async fn run_gateway(config: Config) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", config.gateway.host, config.gateway.port)
        .parse()
        .with_context(|| {
            format!(
                "invalid gateway address {}:{}",
                config.gateway.host, config.gateway.port
            )
        })?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    run_gateway_with_listener(listener, config).await
}

/// Serve from a pre-bound listener (tests bind port 0).
pub async fn run_gateway_with_listener(
    listener: tokio::net::TcpListener,
    config: Config,
) -> Result<()> {
    let local = listener.local_addr()?;
    let pipeline = Arc::new(Pipeline::from_config(&config));
    let app = build_router(AppState { pipeline }, &config.gateway);

    tracing::info!(addr = %local, "Gateway listening");
    println!("◆ Humanizer gateway listening on http://{local}");
    println!("  GET  /health");
    println!("  POST /api/grammar | /api/humanize | /api/detect | /api/plagiarism");
    println!("  POST /api/convert");

    health::record_ok("gateway");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        health::record_error("gateway", &e);
        return Err(e.into());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Gateway shutting down");
}

pub fn build_router(state: AppState, config: &GatewayConfig) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/grammar", post(handle_grammar))
        .route("/api/humanize", post(handle_humanize))
        .route("/api/detect", post(handle_detect))
        .route("/api/plagiarism", post(handle_plagiarism))
        .route("/api/convert", post(handle_convert))
        .with_state(state)
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout_secs),
        ))
        .layer(CorsLayer::permissive())
}
