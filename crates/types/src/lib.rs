// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
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

//! # dwork Types
//!
//! This crate is the foundational library for the dwork marketplace, containing the
//! records persisted by every service, the event stream, the error taxonomy, and the
//! configuration objects.
//!
//! ## Architectural Role
//!
//! As the base crate, `dwork-types` has no dependency on any other workspace crate and
//! is itself a dependency for all of them. Records and call parameters are SCALE-encoded
//! through [`codec`], so every component agrees on one binary representation.

/// Basis-point denominator. 10 000 bps is 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Marketplace records such as `JobRecord`, `Proposal`, and `AccountId`.
pub mod app;
/// The canonical, deterministic binary codec for persisted state and call parameters.
pub mod codec;
/// Top-level configuration loaded from TOML.
pub mod config;
/// A unified set of all error types used across the marketplace.
pub mod error;
/// Constants for well-known state keys and key prefixes.
pub mod keys;
/// Per-service parameter structs and the service capability bitmask.
pub mod service_configs;
