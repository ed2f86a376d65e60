// Path: crates/execution/src/lib.rs
//! # dwork Execution Crate Lints
//!
//! Panics are disallowed in non-test code to promote robust error handling.
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
//! # dwork Execution
//!
//! Wires the marketplace services to a state backend and runs every submitted call
//! atomically: a call either commits all of its writes and events or none of them.

pub mod error;
pub mod machine;

pub use error::ExecutionError;
pub use machine::{MarketMachine, Receipt};
