//! Batch processing
//!
//! Records are handled one at a time in input order. Each record yields
//! exactly one result:
//! - `Dropped` when it has no usable lines (undecodable, empty, all malformed)
//! - `Ok` when at least one line parsed and the single push succeeded
//! - `ProcessingFailed` when the push failed or the batch deadline passed
//!
//! The gateway replaces every family named in a push. Each push therefore
//! carries the series of all records already pushed in this batch plus the
//! current one, so a later record never erases an earlier record's series.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use super::mapper::to_observations;
use super::parse::parse;
use super::response::ResponseBuilder;
use crate::data::pushgateway::{PublishError, Publisher};
use crate::data::types::{
    BatchResult, DecodeError, GaugeObservation, InputRecord, RecordResult,
};
use crate::utils::string::{PREVIEW_MAX_LENGTH, truncate_preview};

/// Orchestrates parse → map → push for every record of a batch
pub struct BatchProcessor {
    publisher: Arc<dyn Publisher>,
    deadline: Option<Duration>,
}

impl BatchProcessor {
    pub fn new(publisher: Arc<dyn Publisher>) -> Self {
        Self {
            publisher,
            deadline: None,
        }
    }

    /// Time budget for one batch, measured from the start of `process`
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Process a batch. The result has one entry per record, same order.
    pub async fn process(&self, records: &[InputRecord]) -> BatchResult {
        let deadline = self.deadline.map(|budget| Instant::now() + budget);
        let mut response = ResponseBuilder::with_capacity(records.len());
        let mut pushed: Vec<GaugeObservation> = Vec::new();

        for record in records {
            let result = match deadline {
                Some(d) if Instant::now() >= d => {
                    tracing::warn!(
                        record_id = %record.id,
                        "Batch deadline passed before record was processed"
                    );
                    RecordResult::ProcessingFailed
                }
                _ => self.process_record(record, &mut pushed, deadline).await,
            };
            response.push(&record.id, result);
        }

        let result = response.build();
        tracing::debug!(
            records = result.len(),
            ok = result.count(RecordResult::Ok),
            dropped = result.count(RecordResult::Dropped),
            failed = result.count(RecordResult::ProcessingFailed),
            "Processed batch"
        );
        result
    }

    async fn process_record(
        &self,
        record: &InputRecord,
        pushed: &mut Vec<GaugeObservation>,
        deadline: Option<Instant>,
    ) -> RecordResult {
        let lines = match payload_lines(&record.payload) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(record_id = %record.id, error = %e, "Dropping undecodable record");
                return RecordResult::Dropped;
            }
        };

        if lines.is_empty() {
            tracing::debug!(record_id = %record.id, "Dropping empty record");
            return RecordResult::Dropped;
        }

        let mut observations = Vec::with_capacity(lines.len() * 4);
        let mut parsed = 0usize;
        for (index, line) in lines.iter().enumerate() {
            match parse(line) {
                Ok(datum) => {
                    observations.extend(to_observations(&datum));
                    parsed += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        record_id = %record.id,
                        line_index = index,
                        line = %truncate_preview(line, PREVIEW_MAX_LENGTH),
                        error = %e,
                        "Skipping malformed metric line"
                    );
                }
            }
        }

        if parsed == 0 {
            tracing::warn!(
                record_id = %record.id,
                lines = lines.len(),
                "Dropping record with no valid metric lines"
            );
            return RecordResult::Dropped;
        }

        let record_observations = observations.len();
        let mut push = Vec::with_capacity(pushed.len() + record_observations);
        push.extend_from_slice(pushed);
        push.append(&mut observations);

        match self.publish(&push, deadline).await {
            Ok(()) => {
                tracing::trace!(
                    record_id = %record.id,
                    lines = lines.len(),
                    parsed,
                    observations = record_observations,
                    batch_observations = push.len(),
                    "Record pushed"
                );
                // Only series the gateway accepted are carried forward
                *pushed = push;
                RecordResult::Ok
            }
            Err(e) => {
                tracing::error!(
                    record_id = %record.id,
                    observations = record_observations,
                    rejected = e.is_rejection(),
                    error = %e,
                    "Failed to push record observations"
                );
                RecordResult::ProcessingFailed
            }
        }
    }

    async fn publish(
        &self,
        observations: &[GaugeObservation],
        deadline: Option<Instant>,
    ) -> Result<(), PublishError> {
        let push = self.publisher.publish(observations);
        match deadline {
            Some(d) => tokio::time::timeout_at(d, push)
                .await
                .unwrap_or(Err(PublishError::Timeout)),
            None => push.await,
        }
    }
}

/// Decode a payload and return its non-blank lines, trimmed
fn payload_lines(payload: &[u8]) -> Result<Vec<&str>, DecodeError> {
    let text = std::str::from_utf8(payload)?;
    Ok(text
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect())
}
