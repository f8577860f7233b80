//! Metric datum to gauge observation mapping

use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use super::sanitize::sanitize;
use crate::data::types::{GaugeLabels, GaugeObservation, MetricDatum, ValueKind};

/// Expand one datum into its four gauges: count, sum, max, min.
///
/// All four share the label set and timestamp; only name and value differ.
pub fn to_observations(datum: &MetricDatum) -> [GaugeObservation; 4] {
    let base_name = sanitize(&datum.metric_name);
    let labels = GaugeLabels {
        namespace: datum.namespace.clone(),
        account_id: datum.account_id.clone(),
        region: datum.region.clone(),
        dimensions: dimensions_repr(&datum.dimensions),
    };

    ValueKind::ALL.map(|kind| GaugeObservation {
        name: format!("{}_{}", base_name, kind.suffix()),
        kind,
        labels: labels.clone(),
        value: kind.select(&datum.value),
        timestamp_millis: datum.timestamp_millis,
    })
}

/// Render dimensions as `{Key=Value, Other=Value}`, keys in sorted order.
///
/// String values are written bare; any other JSON value uses its compact
/// JSON form with object keys sorted at every depth. Equal dimension sets
/// always produce identical strings.
pub fn dimensions_repr(dimensions: &BTreeMap<String, JsonValue>) -> String {
    let body = dimensions
        .iter()
        .map(|(key, value)| match value {
            JsonValue::String(s) => format!("{}={}", key, s),
            other => format!("{}={}", key, sorted_keys(other)),
        })
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}

/// Copy of `value` with every object's keys in sorted order
fn sorted_keys(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(map) => {
            let mut entries: Vec<_> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            JsonValue::Object(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.clone(), sorted_keys(value)))
                    .collect(),
            )
        }
        JsonValue::Array(items) => JsonValue::Array(items.iter().map(sorted_keys).collect()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::ValueAggregate;
    use serde_json::json;

    fn datum() -> MetricDatum {
        let mut dimensions = BTreeMap::new();
        dimensions.insert("TableName".to_string(), json!("T"));
        MetricDatum {
            stream_name: "stream".to_string(),
            account_id: "1".to_string(),
            region: "us-west-2".to_string(),
            namespace: "AWS/DynamoDB".to_string(),
            metric_name: "ConsumedReadCapacityUnits".to_string(),
            dimensions,
            timestamp_millis: 1000,
            value: ValueAggregate {
                count: 1.0,
                sum: 2.0,
                max: 3.0,
                min: 4.0,
            },
            unit: "Count".to_string(),
        }
    }

    #[test]
    fn test_to_observations_names_and_values() {
        let observations = to_observations(&datum());

        let got: Vec<(&str, f64)> = observations
            .iter()
            .map(|o| (o.name.as_str(), o.value))
            .collect();
        assert_eq!(
            got,
            vec![
                ("ConsumedReadCapacityUnits_count", 1.0),
                ("ConsumedReadCapacityUnits_sum", 2.0),
                ("ConsumedReadCapacityUnits_max", 3.0),
                ("ConsumedReadCapacityUnits_min", 4.0),
            ]
        );
    }

    #[test]
    fn test_to_observations_share_labels_and_timestamp() {
        let observations = to_observations(&datum());
        let first = &observations[0];

        assert_eq!(first.labels.namespace, "AWS/DynamoDB");
        assert_eq!(first.labels.account_id, "1");
        assert_eq!(first.labels.region, "us-west-2");
        assert_eq!(first.labels.dimensions, "{TableName=T}");

        for obs in &observations {
            assert_eq!(obs.labels, first.labels);
            assert_eq!(obs.timestamp_millis, 1000);
        }
    }

    #[test]
    fn test_to_observations_sanitizes_name() {
        let mut d = datum();
        d.metric_name = "Read.Latency/p99".to_string();
        let observations = to_observations(&d);
        assert_eq!(observations[0].name, "Read_Latency_p99_count");
        assert_eq!(observations[3].name, "Read_Latency_p99_min");
    }

    #[test]
    fn test_dimensions_repr_sorted_and_stable() {
        let a: BTreeMap<String, JsonValue> =
            serde_json::from_str(r#"{"TableName":"T","Operation":"GetItem"}"#).unwrap();
        let b: BTreeMap<String, JsonValue> =
            serde_json::from_str(r#"{"Operation":"GetItem","TableName":"T"}"#).unwrap();

        assert_eq!(dimensions_repr(&a), "{Operation=GetItem, TableName=T}");
        assert_eq!(dimensions_repr(&a), dimensions_repr(&b));
    }

    #[test]
    fn test_dimensions_repr_non_string_values() {
        let dims: BTreeMap<String, JsonValue> =
            serde_json::from_str(r#"{"Shard":3,"Global":true,"Tags":["a"]}"#).unwrap();
        assert_eq!(
            dimensions_repr(&dims),
            r#"{Global=true, Shard=3, Tags=["a"]}"#
        );
    }

    #[test]
    fn test_dimensions_repr_nested_objects_canonical() {
        let a: BTreeMap<String, JsonValue> =
            serde_json::from_str(r#"{"D":{"x":1,"y":{"b":2,"a":[{"q":1,"p":0}]}}}"#).unwrap();
        let b: BTreeMap<String, JsonValue> =
            serde_json::from_str(r#"{"D":{"y":{"a":[{"p":0,"q":1}],"b":2},"x":1}}"#).unwrap();

        assert_eq!(a, b);
        assert_eq!(dimensions_repr(&a), dimensions_repr(&b));
        assert_eq!(
            dimensions_repr(&a),
            r#"{D={"x":1,"y":{"a":[{"p":0,"q":1}],"b":2}}}"#
        );
    }

    #[test]
    fn test_dimensions_repr_empty() {
        assert_eq!(dimensions_repr(&BTreeMap::new()), "{}");
    }
}
