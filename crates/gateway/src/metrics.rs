//! Gateway-local Prometheus metrics.

use axum::http::StatusCode;
use once_cell::sync::OnceCell;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

static REQUESTS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static REQUEST_LATENCY: OnceCell<HistogramVec> = OnceCell::new();

/// Registers the metric families. Safe to call more than once.
pub(crate) fn install() {
    if REQUESTS_TOTAL.get().is_none() {
        let _ = REQUESTS_TOTAL.set(
            register_int_counter_vec!(
                "sigaid_gateway_requests_total",
                "Total gateway requests by route and result",
                &["route", "result"]
            )
            .expect("register_int_counter_vec"),
        );
    }
    if REQUEST_LATENCY.get().is_none() {
        let _ = REQUEST_LATENCY.set(
            register_histogram_vec!(
                "sigaid_gateway_request_duration_seconds",
                "Gateway request latency (seconds)",
                &["route"],
                prometheus::exponential_buckets(0.0005, 2.0, 14).expect("buckets")
            )
            .expect("register_histogram_vec"),
        );
    }
}

/// Records one handled request.
pub(crate) fn observe(route: &str, result: &str, seconds: f64) {
    if let Some(counter) = REQUESTS_TOTAL.get() {
        counter.with_label_values(&[route, result]).inc();
    }
    if let Some(histogram) = REQUEST_LATENCY.get() {
        histogram.with_label_values(&[route]).observe(seconds);
    }
}

/// The `/metrics` handler.
pub(crate) async fn render() -> Result<String, StatusCode> {
    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&prometheus::gather(), &mut buffer)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    String::from_utf8(buffer).map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}
