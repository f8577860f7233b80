//! Domain logic for metric stream forwarding
//!
//! - `metrics` - record parsing, gauge mapping and batch processing

pub mod metrics;

pub use metrics::BatchProcessor;
