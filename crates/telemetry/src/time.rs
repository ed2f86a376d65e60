// Path: crates/telemetry/src/time.rs
use crate::sinks::ServiceMetricsSink;
use std::time::Instant;

/// Reports the time between its creation and drop as dispatch latency.
pub struct DispatchTimer<'a> {
    sink: &'a dyn ServiceMetricsSink,
    service_id: &'a str,
    method: &'a str,
    start: Instant,
}

impl<'a> DispatchTimer<'a> {
    pub fn new(sink: &'a dyn ServiceMetricsSink, service_id: &'a str, method: &'a str) -> Self {
        Self {
            sink,
            service_id,
            method,
            start: Instant::now(),
        }
    }
}

impl Drop for DispatchTimer<'_> {
    fn drop(&mut self) {
        self.sink.observe_service_dispatch_latency(
            self.service_id,
            self.method,
            self.start.elapsed().as_secs_f64(),
        );
    }
}
