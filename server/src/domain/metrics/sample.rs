//! Canned storage-service metric records for smoke-testing a running server

use serde_json::json;

use crate::data::types::{TransformationRecord, TransformationRequest};

/// Known storage-service metric names with a representative value
pub const SAMPLE_METRICS: &[(&str, f64)] = &[
    ("ConditionalCheckFailedRequests", 100.0),
    ("ConsumedReadCapacityUnits", 200.0),
    ("ConsumedWriteCapacityUnits", 300.0),
    ("ReadThrottleEvents", 10.0),
    ("ReturnedBytes", 1500.0),
    ("ReturnedItemCount", 120.0),
    ("ReturnedRecordsCount", 50.0),
    ("SuccessfulRequestLatency", 35.0),
    ("SystemErrors", 5.0),
    ("TimeToLiveDeletedItemCount", 3.0),
    ("ThrottledRequests", 8.0),
    ("UserErrors", 2.0),
    ("WriteThrottleEvents", 15.0),
    ("OnDemandMaxReadRequestUnits", 1200.0),
    ("OnDemandMaxWriteRequestUnits", 1100.0),
    ("AccountMaxReads", 500.0),
    ("AccountMaxTableLevelReads", 700.0),
    ("AccountMaxTableLevelWrites", 400.0),
    ("AccountMaxWrites", 600.0),
    ("ThrottledPutRecordCount", 10.0),
];

const SAMPLE_NAMESPACE: &str = "AWS/DynamoDB";
const SAMPLE_RECORD_ID: &str = "1234567890";

/// Default value for a known metric name
pub fn sample_value(metric: &str) -> Option<f64> {
    SAMPLE_METRICS
        .iter()
        .find(|(name, _)| *name == metric)
        .map(|(_, value)| *value)
}

/// Comma-separated list of known metric names
pub fn known_metric_names() -> String {
    SAMPLE_METRICS
        .iter()
        .map(|(name, _)| *name)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build a one-record transformation request carrying a single metric document.
///
/// The aggregate describes one observation of `value`, so count is 1 and
/// sum, max and min all equal `value`.
pub fn sample_request(metric: &str, value: f64, timestamp_millis: i64) -> TransformationRequest {
    let document = json!({
        "metricStreamName": "streamgauge-sample",
        "accountId": "000000000000",
        "region": "us-east-1",
        "namespace": SAMPLE_NAMESPACE,
        "metricName": metric,
        "dimensions": { "TableName": "sample" },
        "timestamp": timestamp_millis,
        "value": { "count": 1.0, "sum": value, "max": value, "min": value },
        "unit": "Count",
    });

    let line = format!("{}\n", document);
    TransformationRequest {
        invocation_id: Some(format!("streamgauge-invoke-{}", timestamp_millis)),
        records: vec![TransformationRecord::encode(
            SAMPLE_RECORD_ID,
            line.as_bytes(),
        )],
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::super::parse::parse;

    #[test]
    fn test_sample_value_known_and_unknown() {
        assert_eq!(sample_value("ConsumedReadCapacityUnits"), Some(200.0));
        assert_eq!(sample_value("ThrottledPutRecordCount"), Some(10.0));
        assert_eq!(sample_value("NotAMetric"), None);
    }

    #[test]
    fn test_known_metric_names_lists_all() {
        let names = known_metric_names();
        assert_eq!(names.split(", ").count(), SAMPLE_METRICS.len());
        assert!(names.starts_with("ConditionalCheckFailedRequests"));
    }

    #[test]
    fn test_sample_request_parses_back() {
        let request = sample_request("UserErrors", 2.0, 1_700_000_000_000);
        assert_eq!(request.records.len(), 1);
        assert_eq!(request.records[0].record_id, SAMPLE_RECORD_ID);

        let payload = request.records[0].decode().unwrap();
        let text = std::str::from_utf8(&payload).unwrap();
        let datum = parse(text.trim()).unwrap();

        assert_eq!(datum.metric_name, "UserErrors");
        assert_eq!(datum.namespace, SAMPLE_NAMESPACE);
        assert_eq!(datum.timestamp_millis, 1_700_000_000_000);
        assert_eq!(datum.value.count, 1.0);
        assert_eq!(datum.value.sum, 2.0);
        assert_eq!(datum.value.max, 2.0);
        assert_eq!(datum.value.min, 2.0);
    }
}
