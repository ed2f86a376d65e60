// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram_vec, register_int_counter, register_int_counter_vec,
    register_int_gauge, Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

// --- Metric Statics ---

static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static SVC_DISPATCH_LATENCY_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static SVC_DISPATCH_ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static MARKET_EVENTS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static MARKET_CALLS_COMMITTED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static MARKET_BLOCK_HEIGHT: OnceCell<IntGauge> = OnceCell::new();

#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;

/// Runs `$body` with the metric bound to `$m` if `install()` has run; otherwise does nothing.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, code: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, code]).inc());
    }
}

impl ServiceMetricsSink for PrometheusSink {
    fn observe_service_dispatch_latency(&self, service_id: &str, method: &str, duration_secs: f64) {
        with_metric!(SVC_DISPATCH_LATENCY_SECONDS, |m| m
            .with_label_values(&[service_id, method])
            .observe(duration_secs));
    }
    fn inc_dispatch_error(&self, service_id: &str, method: &str, code: &'static str) {
        with_metric!(SVC_DISPATCH_ERRORS_TOTAL, |m| m
            .with_label_values(&[service_id, method, code])
            .inc());
    }
}

impl MarketMetricsSink for PrometheusSink {
    fn inc_events(&self, name: &'static str) {
        with_metric!(MARKET_EVENTS_TOTAL, |m| m.with_label_values(&[name]).inc());
    }
    fn inc_calls_committed(&self) {
        with_metric!(MARKET_CALLS_COMMITTED_TOTAL, |m| m.inc());
    }
    fn set_block_height(&self, height: u64) {
        with_metric!(MARKET_BLOCK_HEIGHT, |m| m
            .set(i64::try_from(height).unwrap_or(i64::MAX)));
    }
}

/// Registers all collectors with the default registry and installs the global sink.
///
/// Calling it again after a successful install is a no-op.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    if let Some(sink) = SINK.get() {
        return Ok(*sink);
    }
    let _ = ERRORS_TOTAL.set(register_int_counter_vec!(
        "dwork_errors_total",
        "Failed calls by error kind and stable code.",
        &["kind", "code"]
    )?);
    let _ = SVC_DISPATCH_LATENCY_SECONDS.set(register_histogram_vec!(
        "dwork_service_dispatch_latency_seconds",
        "Latency of dispatched service calls.",
        &["service", "method"],
        exponential_buckets(0.0001, 2.0, 16)?
    )?);
    let _ = SVC_DISPATCH_ERRORS_TOTAL.set(register_int_counter_vec!(
        "dwork_service_dispatch_errors_total",
        "Service calls that returned an error.",
        &["service", "method", "code"]
    )?);
    let _ = MARKET_EVENTS_TOTAL.set(register_int_counter_vec!(
        "dwork_events_total",
        "Committed marketplace events by name.",
        &["event"]
    )?);
    let _ = MARKET_CALLS_COMMITTED_TOTAL.set(register_int_counter!(
        "dwork_calls_committed_total",
        "Calls whose state changes were committed."
    )?);
    let _ = MARKET_BLOCK_HEIGHT.set(register_int_gauge!(
        "dwork_block_height",
        "Height the execution machine is at."
    )?);
    let sink: &'static dyn MetricsSink = &PROMETHEUS_SINK;
    Ok(*SINK.get_or_init(|| sink))
}

/// Renders every registered metric in the Prometheus text exposition format.
pub fn render() -> Result<String, prometheus::Error> {
    let mut buffer = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
