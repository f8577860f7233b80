//! Metric document parsing
//!
//! One line of a record payload is one JSON metric document. Field names are
//! camelCase; the snake_case spelling emitted natively by metric streams is
//! accepted too. Unknown fields are ignored.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::data::types::{MetricDatum, ValueAggregate};

/// Why a line could not be turned into a metric datum
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("malformed metric document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("metric document has no metricName")]
    MissingMetricName,

    #[error("metric document has no value object")]
    MissingValue,
}

/// Wire shape of one metric document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetricDocument {
    #[serde(alias = "metric_stream_name")]
    metric_stream_name: Option<String>,
    #[serde(alias = "accountID", alias = "account_id")]
    account_id: Option<String>,
    region: Option<String>,
    namespace: Option<String>,
    #[serde(alias = "metric_name")]
    metric_name: Option<String>,
    dimensions: Option<BTreeMap<String, JsonValue>>,
    timestamp: Option<i64>,
    value: Option<ValueDocument>,
    unit: Option<String>,
}

/// Wire shape of the aggregate; absent or null fields read as zero
#[derive(Debug, Deserialize)]
struct ValueDocument {
    count: Option<f64>,
    sum: Option<f64>,
    max: Option<f64>,
    min: Option<f64>,
}

impl From<ValueDocument> for ValueAggregate {
    fn from(doc: ValueDocument) -> Self {
        Self {
            count: doc.count.unwrap_or_default(),
            sum: doc.sum.unwrap_or_default(),
            max: doc.max.unwrap_or_default(),
            min: doc.min.unwrap_or_default(),
        }
    }
}

/// Parse one non-empty payload line into a metric datum
pub fn parse(line: &str) -> Result<MetricDatum, ParseError> {
    let doc: MetricDocument = serde_json::from_str(line)?;

    let metric_name = doc
        .metric_name
        .filter(|name| !name.trim().is_empty())
        .ok_or(ParseError::MissingMetricName)?;
    let value = doc.value.ok_or(ParseError::MissingValue)?;

    Ok(MetricDatum {
        stream_name: doc.metric_stream_name.unwrap_or_default(),
        account_id: doc.account_id.unwrap_or_default(),
        region: doc.region.unwrap_or_default(),
        namespace: doc.namespace.unwrap_or_default(),
        metric_name,
        dimensions: doc.dimensions.unwrap_or_default(),
        timestamp_millis: doc.timestamp.unwrap_or_default(),
        value: value.into(),
        unit: doc.unit.unwrap_or_default(),
    })
}
