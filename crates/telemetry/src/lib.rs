// Path: crates/telemetry/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! # dwork Telemetry
//!
//! Structured logging initialization and the metrics sinks the execution layer reports
//! into. Instrumented code only sees the sink traits; the Prometheus backend is
//! installed once at startup, and everything falls back to a no-op sink otherwise.

/// The initialization routine for global structured logging.
pub mod init;
/// The concrete implementation of metrics sinks using the `prometheus` crate.
pub mod prometheus;
/// Abstract traits (`*MetricsSink`) that define the contract for metrics reporting.
pub mod sinks;
/// A simple RAII timer for measuring dispatch latency.
pub mod time;

pub use sinks::{error_metrics, market_metrics, service_metrics};
