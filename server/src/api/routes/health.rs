//! Health check endpoint

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::domain::BatchProcessor;

#[derive(Clone)]
pub struct HealthState {
    started: Instant,
    processor: Arc<BatchProcessor>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub uptime_secs: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_ms: Option<u64>,
}

pub fn routes(processor: Arc<BatchProcessor>) -> Router {
    Router::new().route("/", get(health)).with_state(HealthState {
        started: Instant::now(),
        processor,
    })
}

/// Liveness plus the batch deadline the processor runs with
pub async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_secs: state.started.elapsed().as_secs(),
        deadline_ms: state
            .processor
            .deadline()
            .map(|d| d.as_millis() as u64),
    })
}
