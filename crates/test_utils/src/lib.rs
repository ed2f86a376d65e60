// Path: crates/test_utils/src/lib.rs
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

//! # dwork Test Utilities
//!
//! Utilities for testing the dwork marketplace components.

pub mod assertions;
pub mod fixtures;
pub mod token;

pub use token::LedgerToken;

#[doc(hidden)]
pub use dwork_types::error::ErrorCode as __ErrorCode;
