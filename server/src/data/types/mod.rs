//! Shared data types for the metric stream pipeline
//!
//! Used by the domain pipeline, the gateway client and the HTTP layer so all
//! of them agree on one data model.

mod envelope;
mod enums;
mod metrics;

pub use enums::{RecordResult, ValueKind};

pub use envelope::{DecodeError, TransformationRecord, TransformationRequest};

pub use metrics::{
    BatchResult, GaugeLabels, GaugeObservation, InputRecord, MetricDatum, RecordOutcome,
    ValueAggregate,
};
