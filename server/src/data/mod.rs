//! Data layer
//!
//! - `pushgateway` - gateway client that receives gauge pushes
//! - `types` - shared data types (records, observations, outcomes, envelope)

pub mod pushgateway;
pub mod types;

pub use pushgateway::{PublishError, Publisher, PushgatewayClient};
pub use types::{
    BatchResult, GaugeObservation, InputRecord, RecordOutcome, RecordResult,
    TransformationRequest,
};
