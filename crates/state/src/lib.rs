// Path: crates/state/src/lib.rs
//! # dwork State Crate Lints
//!
//! Panics are disallowed in non-test code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # dwork State
//!
//! The canonical state backend the execution layer commits into.

pub mod memory;

pub use memory::MemoryStore;
