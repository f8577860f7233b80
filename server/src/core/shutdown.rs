//! Shutdown signalling and bounded request draining

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use super::constants::SHUTDOWN_TIMEOUT_SECS;

/// Broadcasts a single shutdown signal to whoever is waiting on it
#[derive(Clone)]
pub struct ShutdownService {
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
    drain_timeout: Duration,
}

impl Default for ShutdownService {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownService {
    pub fn new() -> Self {
        Self::with_drain_timeout(Duration::from_secs(SHUTDOWN_TIMEOUT_SECS))
    }

    pub fn with_drain_timeout(drain_timeout: Duration) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: Arc::new(tx),
            rx,
            drain_timeout,
        }
    }

    pub fn trigger(&self) {
        let _ = self.tx.send(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Owned future that resolves once shutdown is triggered
    /// (for axum's graceful shutdown)
    pub fn wait(&self) -> impl Future<Output = ()> + Send + 'static {
        let mut rx = self.rx.clone();
        async move {
            let _ = rx.wait_for(|&v| v).await;
        }
    }

    /// Drive `server` to completion.
    ///
    /// Once shutdown is triggered the server gets the drain timeout to finish
    /// in-flight batches; `None` means it was cut off.
    pub async fn run_until_drained<F>(&self, server: F) -> Option<F::Output>
    where
        F: IntoFuture,
    {
        let server = server.into_future();
        tokio::pin!(server);

        tokio::select! {
            output = &mut server => return Some(output),
            _ = self.wait() => {}
        }

        tracing::debug!(
            timeout_secs = self.drain_timeout.as_secs(),
            "Draining in-flight requests"
        );
        match tokio::time::timeout(self.drain_timeout, server).await {
            Ok(output) => Some(output),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.drain_timeout.as_secs(),
                    "Timeout waiting for in-flight batches, exiting anyway"
                );
                None
            }
        }
    }

    /// Install OS signal handlers and auto-trigger on Ctrl+C/SIGTERM
    pub fn install_signal_handlers(&self) {
        let service = self.clone();
        tokio::spawn(async move {
            let ctrl_c = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                    std::future::pending::<()>().await;
                }
            };

            #[cfg(unix)]
            let terminate = async {
                match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(mut signal) => {
                        signal.recv().await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to install SIGTERM handler");
                        std::future::pending::<()>().await;
                    }
                }
            };

            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::debug!("Received Ctrl+C, shutting down"),
                _ = terminate => tracing::debug!("Received SIGTERM, shutting down"),
            }

            service.trigger();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_triggered_initially() {
        let shutdown = ShutdownService::new();
        assert!(!shutdown.is_triggered());

        shutdown.trigger();
        assert!(shutdown.is_triggered());
    }

    #[tokio::test]
    async fn test_wait_returns_after_trigger() {
        let shutdown = ShutdownService::new();
        let handle = tokio::spawn(shutdown.wait());

        tokio::task::yield_now().await;
        shutdown.trigger();

        tokio::time::timeout(Duration::from_millis(100), handle)
            .await
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_run_until_drained_completes_without_signal() {
        let shutdown = ShutdownService::new();
        let output = shutdown.run_until_drained(async { 7 }).await;
        assert_eq!(output, Some(7));
    }

    #[tokio::test]
    async fn test_run_until_drained_lets_server_finish() {
        let shutdown = ShutdownService::with_drain_timeout(Duration::from_secs(1));
        let server_signal = shutdown.wait();
        shutdown.trigger();

        let output = shutdown
            .run_until_drained(async move {
                server_signal.await;
                tokio::time::sleep(Duration::from_millis(10)).await;
                "drained"
            })
            .await;
        assert_eq!(output, Some("drained"));
    }

    #[tokio::test]
    async fn test_run_until_drained_cuts_off_stuck_server() {
        let shutdown = ShutdownService::with_drain_timeout(Duration::from_millis(20));
        shutdown.trigger();

        let output = shutdown
            .run_until_drained(std::future::pending::<()>())
            .await;
        assert_eq!(output, None);
    }
}
