//! Prometheus metrics for the prediction service.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use tracing::debug;

// === Metric Name Constants ===

/// Prediction latency metric name.
pub const METRIC_PREDICT_LATENCY: &str = "predict_latency_ms";
/// Predictions served counter metric name.
pub const METRIC_PREDICTIONS_SERVED: &str = "predictions_served_total";
/// Encoding failures counter metric name.
pub const METRIC_ENCODING_FAILURES: &str = "encoding_failures_total";
/// Prediction failures counter metric name.
pub const METRIC_PREDICTION_FAILURES: &str = "prediction_failures_total";
/// Requests rejected for missing artifacts counter metric name.
pub const METRIC_ARTIFACT_UNAVAILABLE: &str = "artifact_unavailable_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_PREDICT_LATENCY,
        "End-to-end /predict handler latency in milliseconds"
    );

    describe_counter!(
        METRIC_PREDICTIONS_SERVED,
        "Total number of successful predictions served"
    );
    describe_counter!(
        METRIC_ENCODING_FAILURES,
        "Total number of requests rejected for unknown categorical labels"
    );
    describe_counter!(
        METRIC_PREDICTION_FAILURES,
        "Total number of model inference failures"
    );
    describe_counter!(
        METRIC_ARTIFACT_UNAVAILABLE,
        "Total number of requests rejected because an artifact was not loaded"
    );

    debug!("Metrics initialized");
}

/// Record /predict handler latency.
pub fn record_predict_latency(start: Instant) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_PREDICT_LATENCY).record(latency_ms);
}

/// Increment predictions served counter.
pub fn inc_predictions_served() {
    counter!(METRIC_PREDICTIONS_SERVED).increment(1);
}

/// Increment encoding failures counter.
pub fn inc_encoding_failures() {
    counter!(METRIC_ENCODING_FAILURES).increment(1);
}

/// Increment prediction failures counter.
pub fn inc_prediction_failures() {
    counter!(METRIC_PREDICTION_FAILURES).increment(1);
}

/// Increment artifact-unavailable rejections counter.
pub fn inc_artifact_unavailable() {
    counter!(METRIC_ARTIFACT_UNAVAILABLE).increment(1);
}
