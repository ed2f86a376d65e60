// Path: crates/api/src/transaction/mod.rs
//! The per-call execution context.

pub mod context;
