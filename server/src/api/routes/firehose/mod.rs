//! Metric stream transformation endpoint
//!
//! Accepts a delivery batch, pushes each record's gauges and answers with one
//! result per record in input order.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::extract::rejection::BytesRejection;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::types::ApiError;
use crate::data::types::{BatchResult, RecordResult, TransformationRequest};
use crate::domain::BatchProcessor;

#[derive(Clone)]
pub struct FirehoseState {
    pub processor: Arc<BatchProcessor>,
}

pub fn routes(processor: Arc<BatchProcessor>) -> Router {
    Router::new()
        .route("/transform", post(transform))
        .with_state(FirehoseState { processor })
}

/// Process a transformation request
pub async fn transform(
    State(state): State<FirehoseState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<BatchResult>, ApiError> {
    let body = body.map_err(ApiError::from_body_rejection)?;

    let request: TransformationRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::warn!(error = %e, "Malformed transformation request");
        ApiError::bad_request(
            "INVALID_REQUEST",
            format!("Invalid transformation request: {}", e),
        )
    })?;

    let invocation_id = request.invocation_id.clone().unwrap_or_default();
    let records = request.into_input_records();
    tracing::debug!(
        invocation_id = %invocation_id,
        records = records.len(),
        "Transformation request received"
    );

    let result = state.processor.process(&records).await;

    tracing::info!(
        invocation_id = %invocation_id,
        records = result.len(),
        ok = result.count(RecordResult::Ok),
        dropped = result.count(RecordResult::Dropped),
        failed = result.count(RecordResult::ProcessingFailed),
        "Batch processed"
    );

    Ok(Json(result))
}
