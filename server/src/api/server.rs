//! API server initialization

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use tokio::net::TcpListener;
use tower_http::decompression::RequestDecompressionLayer;
use tower_http::trace::TraceLayer;

use super::middleware;
use super::routes::{firehose, health};
use crate::core::CoreApp;
use crate::core::constants::{DEFAULT_BODY_LIMIT, TRANSFORM_BODY_LIMIT};
use crate::domain::BatchProcessor;

pub struct ApiServer {
    app: CoreApp,
}

impl ApiServer {
    pub fn new(app: CoreApp) -> Self {
        Self { app }
    }

    /// Serve until shutdown, then hand the app back
    pub async fn start(self) -> Result<CoreApp> {
        let Self { app } = self;

        let shutdown = app.shutdown.clone();

        let host = app.config.server.host.clone();
        let port = app.config.server.port;
        let addr = SocketAddr::new(host.parse()?, port);

        let router = router(app.processor.clone());

        let listener = TcpListener::bind(addr).await?;
        tracing::debug!(addr = %addr, "HTTP server listening");

        let serve = axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown.wait());

        if let Some(result) = shutdown.run_until_drained(serve).await {
            result?;
        }

        Ok(app)
    }
}

/// Build the application router
pub fn router(processor: Arc<BatchProcessor>) -> Router {
    // Delivery streams may gzip the request body
    let firehose_routes = firehose::routes(processor.clone())
        .layer(DefaultBodyLimit::max(TRANSFORM_BODY_LIMIT))
        .layer(RequestDecompressionLayer::new());

    Router::new()
        .nest("/api/v1/health", health::routes(processor))
        .nest("/api/v1/firehose", firehose_routes)
        .fallback(middleware::handle_404)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(DEFAULT_BODY_LIMIT))
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::data::pushgateway::{PublishError, Publisher};
    use crate::data::types::GaugeObservation;

    struct NoopPublisher;

    #[async_trait]
    impl Publisher for NoopPublisher {
        async fn publish(&self, _observations: &[GaugeObservation]) -> Result<(), PublishError> {
            Ok(())
        }
    }

    fn test_router() -> Router {
        router(Arc::new(BatchProcessor::new(Arc::new(NoopPublisher))))
    }

    #[tokio::test]
    async fn test_health() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
        assert!(json.get("deadline_ms").is_none());
    }

    #[tokio::test]
    async fn test_health_reports_deadline() {
        let processor = BatchProcessor::new(Arc::new(NoopPublisher))
            .with_deadline(Some(std::time::Duration::from_millis(1500)));
        let response = router(Arc::new(processor))
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["deadline_ms"], 1500);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/nope")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transform_route_is_mounted() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/firehose/transform")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"records":[]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_transform_body_over_limit() {
        let oversized = "x".repeat(TRANSFORM_BODY_LIMIT + 1);
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/firehose/transform")
                    .body(Body::from(oversized))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
