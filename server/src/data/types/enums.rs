//! Classification enums for metric records
//!
//! These enums describe how a metric aggregate is split into gauges and how
//! each delivered record is reported back to the stream.

use serde::{Deserialize, Serialize};

use super::metrics::ValueAggregate;

// ============================================================================
// VALUE KINDS
// ============================================================================

/// Aggregate statistic a gauge is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Count,
    Sum,
    Max,
    Min,
}

impl ValueKind {
    /// Every kind, in the order gauges are emitted
    pub const ALL: [ValueKind; 4] = [Self::Count, Self::Sum, Self::Max, Self::Min];

    /// Gauge name suffix (appended after `_`)
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Sum => "sum",
            Self::Max => "max",
            Self::Min => "min",
        }
    }

    /// Help text attached to the gauge family
    pub fn help(&self) -> &'static str {
        match self {
            Self::Count => "Count metric",
            Self::Sum => "Sum metric",
            Self::Max => "Max metric",
            Self::Min => "Min metric",
        }
    }

    /// Pick the matching field out of an aggregate
    pub fn select(&self, value: &ValueAggregate) -> f64 {
        match self {
            Self::Count => value.count,
            Self::Sum => value.sum,
            Self::Max => value.max,
            Self::Min => value.min,
        }
    }
}

// ============================================================================
// RECORD RESULTS
// ============================================================================

/// Delivery result reported for one input record
///
/// Serialized with the exact spelling the stream delivery service expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordResult {
    /// All parsed documents were pushed
    Ok,
    /// Nothing usable in the record; do not retry
    Dropped,
    /// Push failed or the deadline passed; the record may be retried
    ProcessingFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_kind_order_and_suffixes() {
        let suffixes: Vec<_> = ValueKind::ALL.iter().map(|k| k.suffix()).collect();
        assert_eq!(suffixes, vec!["count", "sum", "max", "min"]);
    }

    #[test]
    fn test_value_kind_select() {
        let value = ValueAggregate {
            count: 1.0,
            sum: 2.0,
            max: 3.0,
            min: 4.0,
        };
        assert_eq!(ValueKind::Count.select(&value), 1.0);
        assert_eq!(ValueKind::Sum.select(&value), 2.0);
        assert_eq!(ValueKind::Max.select(&value), 3.0);
        assert_eq!(ValueKind::Min.select(&value), 4.0);
    }

    #[test]
    fn test_record_result_serde() {
        assert_eq!(
            serde_json::to_string(&RecordResult::ProcessingFailed).unwrap(),
            r#""ProcessingFailed""#
        );
        let parsed: RecordResult = serde_json::from_str(r#""Dropped""#).unwrap();
        assert_eq!(parsed, RecordResult::Dropped);
    }
}
