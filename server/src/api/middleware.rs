//! HTTP middleware (404 handler)

use axum::body::to_bytes;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::utils::string::{PREVIEW_MAX_LENGTH, truncate_preview};

const MAX_404_BODY_LOG: usize = 64 * 1024; // 64KB limit for logging

/// Handle 404 Not Found with logging
pub async fn handle_404(req: Request) -> impl IntoResponse {
    if !tracing::enabled!(tracing::Level::DEBUG) {
        return StatusCode::NOT_FOUND;
    }

    let method = req.method().clone();
    let uri = req.uri().clone();

    let body_bytes = match to_bytes(req.into_body(), MAX_404_BODY_LOG).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::debug!("[404] {} {} (failed to read body)", method, uri);
            return StatusCode::NOT_FOUND;
        }
    };

    let body = if body_bytes.is_empty() {
        String::new()
    } else {
        match std::str::from_utf8(&body_bytes) {
            Ok(text) => truncate_preview(text, PREVIEW_MAX_LENGTH),
            Err(_) => format!("<binary {} bytes>", body_bytes.len()),
        }
    };

    tracing::debug!(
        method = %method,
        uri = %uri,
        body = %body,
        "[404] No route matched"
    );

    StatusCode::NOT_FOUND
}
