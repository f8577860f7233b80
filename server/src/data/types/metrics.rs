//! Metric stream data model
//!
//! Everything here lives for the duration of one batch: records come in,
//! observations go out to the gateway, outcomes go back to the caller.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::enums::{RecordResult, ValueKind};

/// One record delivered by the stream, payload still undecoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub id: String,
    pub payload: Vec<u8>,
}

impl InputRecord {
    pub fn new(id: impl Into<String>, payload: impl Into<Vec<u8>>) -> Self {
        Self {
            id: id.into(),
            payload: payload.into(),
        }
    }
}

/// count/sum/max/min over one aggregation window
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ValueAggregate {
    pub count: f64,
    pub sum: f64,
    pub max: f64,
    pub min: f64,
}

/// One decoded metric document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetricDatum {
    pub stream_name: String,
    pub account_id: String,
    pub region: String,
    pub namespace: String,
    pub metric_name: String,
    /// Sorted by key so the label rendering is stable
    pub dimensions: BTreeMap<String, JsonValue>,
    pub timestamp_millis: i64,
    pub value: ValueAggregate,
    pub unit: String,
}

/// Label set shared by the four gauges of one datum
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GaugeLabels {
    pub namespace: String,
    pub account_id: String,
    pub region: String,
    pub dimensions: String,
}

impl GaugeLabels {
    /// Label name/value pairs in exposition order
    pub fn pairs(&self) -> [(&'static str, &str); 4] {
        [
            ("namespace", &self.namespace),
            ("account_id", &self.account_id),
            ("region", &self.region),
            ("dimensions", &self.dimensions),
        ]
    }
}

/// A single named, labelled, timestamped gauge sample
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeObservation {
    pub name: String,
    pub kind: ValueKind,
    pub labels: GaugeLabels,
    pub value: f64,
    pub timestamp_millis: i64,
}

/// Result for one input record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordOutcome {
    pub record_id: String,
    pub result: RecordResult,
}

/// Ordered per-record results, one entry per input record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    pub records: Vec<RecordOutcome>,
}

impl BatchResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records that ended with the given result
    pub fn count(&self, result: RecordResult) -> usize {
        self.records.iter().filter(|r| r.result == result).count()
    }
}
