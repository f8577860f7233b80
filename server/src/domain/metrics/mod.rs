//! Metric Stream Processing Pipeline
//!
//! Turns delivered metric stream records into gauge pushes:
//! payload lines → metric documents → four gauges each → one push per record.

mod batch;
mod mapper;
mod parse;
mod response;
mod sample;
mod sanitize;

pub use batch::BatchProcessor;
pub use mapper::{dimensions_repr, to_observations};
pub use parse::{ParseError, parse};
pub use response::ResponseBuilder;
pub use sample::{SAMPLE_METRICS, known_metric_names, sample_request, sample_value};
pub use sanitize::sanitize;
