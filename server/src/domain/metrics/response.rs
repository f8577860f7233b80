//! Batch response assembly

use crate::data::types::{BatchResult, RecordOutcome, RecordResult};

/// Collects one outcome per input record, in input order
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    records: Vec<RecordOutcome>,
}

impl ResponseBuilder {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, record_id: &str, result: RecordResult) {
        self.records.push(RecordOutcome {
            record_id: record_id.to_string(),
            result,
        });
    }

    pub fn build(self) -> BatchResult {
        BatchResult {
            records: self.records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_preserves_order() {
        let mut builder = ResponseBuilder::with_capacity(3);
        builder.push("c", RecordResult::Ok);
        builder.push("a", RecordResult::ProcessingFailed);
        builder.push("b", RecordResult::Dropped);

        let result = builder.build();
        let ids: Vec<_> = result.records.iter().map(|r| r.record_id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
        assert_eq!(result.records[1].result, RecordResult::ProcessingFailed);
    }

    #[test]
    fn test_build_empty() {
        assert!(ResponseBuilder::default().build().is_empty());
    }
}
