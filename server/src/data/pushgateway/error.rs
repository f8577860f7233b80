//! Gateway push error types

use thiserror::Error;

/// Errors from a gateway push
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("Invalid gateway URL: {0}")]
    InvalidUrl(String),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Gateway rejected push with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Failed to encode observations: {0}")]
    Encode(#[from] prometheus::Error),

    #[error("Push timed out")]
    Timeout,
}

impl PublishError {
    /// Whether the gateway answered at all
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_display() {
        let err = PublishError::Rejected {
            status: 400,
            body: "invalid metric name".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Gateway rejected push with status 400: invalid metric name"
        );
        assert!(err.is_rejection());
    }

    #[test]
    fn test_invalid_url_display() {
        let err = PublishError::InvalidUrl("mailto:x".to_string());
        assert_eq!(err.to_string(), "Invalid gateway URL: mailto:x");
        assert!(!err.is_rejection());
        assert!(!PublishError::Timeout.is_rejection());
    }
}
