//! Prometheus text exposition encoding (format 0.0.4)
//!
//! Every push builds its own `Registry`. Nothing is registered globally, so
//! families never leak from one push into the next.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use prometheus::proto::{Metric, MetricFamily};
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};

use crate::data::types::{GaugeLabels, GaugeObservation};

/// Content type the gateway expects for text pushes
pub const TEXT_CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

const LABEL_NAMES: [&str; 4] = ["namespace", "account_id", "region", "dimensions"];

/// Render observations as one text exposition body.
///
/// A repeated name + label set keeps the last value, since the gateway
/// refuses a push that carries the same series twice. Invalid metric names
/// fail here, before anything is sent.
pub fn encode_text(
    observations: &[GaugeObservation],
    with_timestamps: bool,
) -> Result<Vec<u8>, prometheus::Error> {
    let registry = Registry::new();
    let mut families: HashMap<&str, GaugeVec> = HashMap::new();

    for obs in observations {
        let family = match families.entry(obs.name.as_str()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let opts = Opts::new(obs.name.as_str(), obs.kind.help());
                let gauge = GaugeVec::new(opts, &LABEL_NAMES)?;
                registry.register(Box::new(gauge.clone()))?;
                entry.insert(gauge)
            }
        };
        let values = obs.labels.pairs().map(|(_, value)| value);
        family.get_metric_with_label_values(&values)?.set(obs.value);
    }

    let mut gathered = registry.gather();
    if with_timestamps {
        stamp(&mut gathered, observations);
    }

    let mut buffer = Vec::new();
    TextEncoder::new().encode(&gathered, &mut buffer)?;
    Ok(buffer)
}

/// Attach each series' datum timestamp, last observation wins
fn stamp(gathered: &mut [MetricFamily], observations: &[GaugeObservation]) {
    let mut stamps: HashMap<&str, HashMap<&GaugeLabels, i64>> = HashMap::new();
    for obs in observations {
        stamps
            .entry(obs.name.as_str())
            .or_default()
            .insert(&obs.labels, obs.timestamp_millis);
    }

    for family in gathered {
        let name = family.get_name().to_string();
        let Some(series) = stamps.get(name.as_str()) else {
            continue;
        };
        for metric in family.mut_metric().iter_mut() {
            if let Some(ts) = series.get(&labels_of(metric)) {
                metric.set_timestamp_ms(*ts);
            }
        }
    }
}

fn labels_of(metric: &Metric) -> GaugeLabels {
    let mut labels = GaugeLabels::default();
    for pair in metric.get_label() {
        let value = pair.get_value().to_string();
        match pair.get_name() {
            "namespace" => labels.namespace = value,
            "account_id" => labels.account_id = value,
            "region" => labels.region = value,
            "dimensions" => labels.dimensions = value,
            _ => {}
        }
    }
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::types::ValueKind;

    fn labels(dimensions: &str) -> GaugeLabels {
        GaugeLabels {
            namespace: "AWS/DynamoDB".to_string(),
            account_id: "1".to_string(),
            region: "us-west-2".to_string(),
            dimensions: dimensions.to_string(),
        }
    }

    fn obs(name: &str, kind: ValueKind, dimensions: &str, value: f64) -> GaugeObservation {
        GaugeObservation {
            name: name.to_string(),
            kind,
            labels: labels(dimensions),
            value,
            timestamp_millis: 1000,
        }
    }

    fn render(observations: &[GaugeObservation], with_timestamps: bool) -> String {
        String::from_utf8(encode_text(observations, with_timestamps).unwrap()).unwrap()
    }

    fn samples(body: &str) -> Vec<&str> {
        body.lines().filter(|l| !l.starts_with('#')).collect()
    }

    #[test]
    fn test_encode_single_family() {
        let body = render(
            &[obs("Reads_count", ValueKind::Count, "{TableName=T}", 1.0)],
            false,
        );
        assert!(body.contains("# HELP Reads_count Count metric\n"));
        assert!(body.contains("# TYPE Reads_count gauge\n"));

        let lines = samples(&body);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Reads_count{"));
        assert!(lines[0].ends_with("} 1"));
        for pair in [
            "namespace=\"AWS/DynamoDB\"",
            "account_id=\"1\"",
            "region=\"us-west-2\"",
            "dimensions=\"{TableName=T}\"",
        ] {
            assert!(lines[0].contains(pair), "missing {pair} in {}", lines[0]);
        }
    }

    #[test]
    fn test_encode_with_timestamps() {
        let body = render(&[obs("Reads_sum", ValueKind::Sum, "{}", 2.5)], true);
        assert_eq!(samples(&body).len(), 1);
        assert!(samples(&body)[0].ends_with("} 2.5 1000"));

        let body = render(&[obs("Reads_sum", ValueKind::Sum, "{}", 2.5)], false);
        assert!(samples(&body)[0].ends_with("} 2.5"));
    }

    #[test]
    fn test_encode_groups_samples_by_family() {
        let body = render(
            &[
                obs("Reads_count", ValueKind::Count, "{TableName=A}", 1.0),
                obs("Reads_sum", ValueKind::Sum, "{TableName=A}", 2.0),
                obs("Reads_count", ValueKind::Count, "{TableName=B}", 3.0),
            ],
            false,
        );
        assert_eq!(body.matches("# TYPE Reads_count gauge").count(), 1);
        assert_eq!(body.matches("# TYPE Reads_sum gauge").count(), 1);
        assert_eq!(samples(&body).len(), 3);
        assert_eq!(body.matches("Reads_count{").count(), 2);
    }

    #[test]
    fn test_encode_duplicate_series_last_wins() {
        let body = render(
            &[
                obs("Reads_max", ValueKind::Max, "{TableName=A}", 1.0),
                obs("Reads_max", ValueKind::Max, "{TableName=A}", 7.0),
            ],
            false,
        );
        let lines = samples(&body);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].ends_with("} 7"));
    }

    #[test]
    fn test_encode_escapes_label_values() {
        let body = render(
            &[obs("Reads_min", ValueKind::Min, "{Key=a\"b}", 0.0)],
            false,
        );
        assert!(body.contains(r#"dimensions="{Key=a\"b}""#));
    }

    #[test]
    fn test_encode_rejects_invalid_name() {
        let result = encode_text(&[obs("9Reads_count", ValueKind::Count, "{}", 1.0)], false);
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_empty() {
        assert_eq!(render(&[], false), "");
    }
}
