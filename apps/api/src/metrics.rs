//! In-process metrics collection for parsing performance and success rates.

use std::collections::BTreeMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    UploadSize,
    ParseDuration,
    ParseSuccess,
    ParseFailure,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: MetricKind,
    pub value: f64,
    pub trace_id: String,
    pub labels: BTreeMap<String, String>,
}

/// Aggregate view over all recorded parse events.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseMetrics {
    pub total_parses: u64,
    pub successful_parses: u64,
    pub failed_parses: u64,
    pub success_rate: f64,
    pub average_duration_ms: f64,
    pub total_warnings: u64,
    pub sections_extracted_total: u64,
    pub skills_extracted_total: u64,
}

/// Collects parse lifecycle events. Append-only under a mutex; each job
/// touches it three times at most, so contention is not a concern.
#[derive(Default)]
pub struct MetricsCollector {
    events: Mutex<Vec<MetricEvent>>,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, kind: MetricKind, value: f64, trace_id: &str, labels: BTreeMap<String, String>) {
        let event = MetricEvent {
            timestamp: Utc::now(),
            kind,
            value,
            trace_id: trace_id.to_string(),
            labels,
        };
        self.events.lock().expect("metrics lock poisoned").push(event);
    }

    /// Records the start of a parse job and returns a trace id that ties the
    /// later success/failure event back to it.
    pub fn record_parse_start(&self, id: &str, file_format: &str, file_size_bytes: u64) -> String {
        let trace_id = format!("parse_{}_{}", id, Utc::now().timestamp());
        let labels = BTreeMap::from([("format".to_string(), file_format.to_string())]);
        self.record(MetricKind::UploadSize, file_size_bytes as f64, &trace_id, labels);
        trace_id
    }

    pub fn record_parse_success(
        &self,
        trace_id: &str,
        duration_ms: u64,
        sections_count: usize,
        skills_count: usize,
        warnings_count: usize,
    ) {
        let labels = BTreeMap::from([
            ("sections".to_string(), sections_count.to_string()),
            ("skills".to_string(), skills_count.to_string()),
            ("warnings".to_string(), warnings_count.to_string()),
        ]);
        self.record(MetricKind::ParseDuration, duration_ms as f64, trace_id, labels.clone());
        self.record(MetricKind::ParseSuccess, 1.0, trace_id, labels);
    }

    pub fn record_parse_failure(&self, trace_id: &str, duration_ms: u64, error_kind: &str) {
        let labels = BTreeMap::from([("error_kind".to_string(), error_kind.to_string())]);
        self.record(MetricKind::ParseDuration, duration_ms as f64, trace_id, labels.clone());
        self.record(MetricKind::ParseFailure, 1.0, trace_id, labels);
    }

    /// Aggregates all recorded events into summary statistics.
    pub fn snapshot(&self) -> ParseMetrics {
        let events = self.events.lock().expect("metrics lock poisoned");

        let mut metrics = ParseMetrics::default();
        let mut duration_sum = 0.0;
        let mut duration_count = 0u64;

        for event in events.iter() {
            match event.kind {
                MetricKind::ParseSuccess => {
                    metrics.successful_parses += 1;
                    for (key, field) in [
                        ("sections", &mut metrics.sections_extracted_total),
                        ("skills", &mut metrics.skills_extracted_total),
                        ("warnings", &mut metrics.total_warnings),
                    ] {
                        if let Some(n) = event.labels.get(key).and_then(|v| v.parse::<u64>().ok()) {
                            *field += n;
                        }
                    }
                }
                MetricKind::ParseFailure => metrics.failed_parses += 1,
                MetricKind::ParseDuration => {
                    duration_sum += event.value;
                    duration_count += 1;
                }
                MetricKind::UploadSize => {}
            }
        }

        metrics.total_parses = metrics.successful_parses + metrics.failed_parses;
        if metrics.total_parses > 0 {
            metrics.success_rate =
                metrics.successful_parses as f64 / metrics.total_parses as f64 * 100.0;
        }
        if duration_count > 0 {
            metrics.average_duration_ms = duration_sum / duration_count as f64;
        }

        metrics
    }
}
