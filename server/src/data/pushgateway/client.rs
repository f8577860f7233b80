//! HTTP client for the Prometheus Pushgateway

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use reqwest::header::CONTENT_TYPE;

use super::encoding::{TEXT_CONTENT_TYPE, encode_text};
use super::error::PublishError;
use crate::core::config::PushgatewayConfig;
use crate::data::types::GaugeObservation;

/// Max bytes of a rejection body kept for logging
const MAX_REJECTION_BODY: usize = 512;

/// Sends a set of gauge observations to the gateway as one push
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, observations: &[GaugeObservation]) -> Result<(), PublishError>;
}

/// Pushgateway client using additive (`POST`) pushes under one job
pub struct PushgatewayClient {
    http: reqwest::Client,
    push_url: Url,
    with_timestamps: bool,
}

impl PushgatewayClient {
    pub fn new(config: &PushgatewayConfig) -> Result<Self, PublishError> {
        let push_url = build_push_url(&config.url, &config.job)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        tracing::debug!(url = %push_url, "Pushgateway client initialized");

        Ok(Self {
            http,
            push_url,
            with_timestamps: config.timestamps,
        })
    }

    pub fn push_url(&self) -> &Url {
        &self.push_url
    }
}

#[async_trait]
impl Publisher for PushgatewayClient {
    async fn publish(&self, observations: &[GaugeObservation]) -> Result<(), PublishError> {
        if observations.is_empty() {
            return Ok(());
        }

        let body = encode_text(observations, self.with_timestamps)?;
        let response = self
            .http
            .post(self.push_url.clone())
            .header(CONTENT_TYPE, TEXT_CONTENT_TYPE)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            tracing::trace!(
                observations = observations.len(),
                status = status.as_u16(),
                "Pushed observations"
            );
            return Ok(());
        }

        let mut body = response.text().await.unwrap_or_default();
        if body.len() > MAX_REJECTION_BODY {
            let mut cut = MAX_REJECTION_BODY;
            while !body.is_char_boundary(cut) {
                cut -= 1;
            }
            body.truncate(cut);
        }

        Err(PublishError::Rejected {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

/// Build `<base>/metrics/job/<job>`, percent-encoding the job segment
fn build_push_url(base: &str, job: &str) -> Result<Url, PublishError> {
    let mut url = Url::parse(base).map_err(|e| PublishError::InvalidUrl(format!("{base}: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(PublishError::InvalidUrl(base.to_string()));
    }

    url.path_segments_mut()
        .map_err(|_| PublishError::InvalidUrl(base.to_string()))?
        .pop_if_empty()
        .extend(["metrics", "job", job]);

    Ok(url)
}
