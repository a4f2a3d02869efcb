use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, register_int_counter_vec, HistogramVec, IntCounterVec};

// Define latency buckets for histograms
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

lazy_static! {
    #[allow(clippy::expect_used)]
    pub static ref EXTERNAL_SERVICE_API_CALLS_LATENCY: HistogramVec = register_histogram_vec!(
        "EXTERNAL_SERVICE_API_CALLS_LATENCY_SECONDS",
        "Latency of external service API calls",
        &["method", "connector"],
        LATENCY_BUCKETS.to_vec()
    )
    .expect("failed to register external service latency histogram");
    #[allow(clippy::expect_used)]
    pub static ref EXTERNAL_SERVICE_TOTAL_API_CALLS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_TOTAL_API_CALLS",
        "Total number of external service API calls",
        &["method", "connector"]
    )
    .expect("failed to register external service call counter");
    #[allow(clippy::expect_used)]
    pub static ref EXTERNAL_SERVICE_API_CALLS_ERRORS: IntCounterVec = register_int_counter_vec!(
        "EXTERNAL_SERVICE_API_CALLS_ERRORS",
        "Total number of errors in external service API calls",
        &["method", "connector", "error"]
    )
    .expect("failed to register external service error counter");
}

/// Records one finished outgoing call.
pub fn record_api_call(method: &str, connector: &str, latency_seconds: f64) {
    EXTERNAL_SERVICE_TOTAL_API_CALLS
        .with_label_values(&[method, connector])
        .inc();
    EXTERNAL_SERVICE_API_CALLS_LATENCY
        .with_label_values(&[method, connector])
        .observe(latency_seconds);
}

pub fn record_api_call_error(method: &str, connector: &str, error: &str) {
    EXTERNAL_SERVICE_API_CALLS_ERRORS
        .with_label_values(&[method, connector, error])
        .inc();
}
