// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns the configured error metrics sink, or a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured service metrics sink, or a no-op sink.
pub fn service_metrics() -> &'static dyn ServiceMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

/// Returns the configured marketplace metrics sink, or a no-op sink.
pub fn market_metrics() -> &'static dyn MarketMetricsSink {
    SINK.get().copied().unwrap_or(&NOP_SINK)
}

// --- Trait Definitions ---

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a failed call, categorized by error kind and stable code.
    fn inc_error(&self, kind: &'static str, code: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _code: &'static str) {}
}

/// A sink for metrics about service dispatch.
pub trait ServiceMetricsSink: Send + Sync + std::fmt::Debug {
    /// Observes the latency of a dispatched call, labeled by service and method.
    fn observe_service_dispatch_latency(&self, service_id: &str, method: &str, duration_secs: f64);
    /// Increments a counter for failed calls, labeled by service, method and error code.
    fn inc_dispatch_error(&self, service_id: &str, method: &str, code: &'static str);
}
impl ServiceMetricsSink for NopSink {
    fn observe_service_dispatch_latency(
        &self,
        _service_id: &str,
        _method: &str,
        _duration_secs: f64,
    ) {
    }
    fn inc_dispatch_error(&self, _service_id: &str, _method: &str, _code: &'static str) {}
}

/// A sink for marketplace activity.
pub trait MarketMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a committed event, labeled by event name.
    fn inc_events(&self, name: &'static str);
    /// Increments the counter of committed calls.
    fn inc_calls_committed(&self);
    /// Sets the gauge for the current block height.
    fn set_block_height(&self, height: u64);
}
impl MarketMetricsSink for NopSink {
    fn inc_events(&self, _name: &'static str) {}
    fn inc_calls_committed(&self) {}
    fn set_block_height(&self, _height: u64) {}
}

/// A unified sink that implements all domain-specific traits.
pub trait MetricsSink: ErrorMetricsSink + ServiceMetricsSink + MarketMetricsSink {}

impl<T> MetricsSink for T where T: ErrorMetricsSink + ServiceMetricsSink + MarketMetricsSink {}
