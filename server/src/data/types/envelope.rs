//! Stream delivery transformation envelope
//!
//! The delivery service hands over a batch as JSON with base64-encoded record
//! data and expects `{ "records": [{ "recordId", "result" }] }` back (see
//! `BatchResult`).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::metrics::InputRecord;

/// Why a record payload could not be turned into text
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("record data is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("record payload is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

/// A batch as delivered by the stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invocation_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_stream_arn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    pub records: Vec<TransformationRecord>,
}

/// One delivered record, data still base64-encoded
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformationRecord {
    pub record_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub approximate_arrival_timestamp: Option<i64>,
    pub data: String,
}

impl TransformationRecord {
    /// Wrap a raw payload, base64-encoding it
    pub fn encode(record_id: impl Into<String>, payload: &[u8]) -> Self {
        Self {
            record_id: record_id.into(),
            approximate_arrival_timestamp: None,
            data: BASE64.encode(payload),
        }
    }

    /// Decode the base64 data into raw payload bytes
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        Ok(BASE64.decode(self.data.trim())?)
    }
}

impl TransformationRequest {
    /// Convert into input records, preserving order.
    ///
    /// Records whose data is not valid base64 keep their place with an empty
    /// payload, so they come back as `Dropped` rather than vanishing.
    pub fn into_input_records(self) -> Vec<InputRecord> {
        self.records
            .into_iter()
            .map(|record| {
                let payload = record.decode().unwrap_or_else(|e| {
                    tracing::warn!(
                        record_id = %record.record_id,
                        error = %e,
                        "Undecodable record data, treating as empty"
                    );
                    Vec::new()
                });
                InputRecord::new(record.record_id, payload)
            })
            .collect()
    }
}
