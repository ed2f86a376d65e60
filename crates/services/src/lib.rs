// Path: crates/services/src/lib.rs
#![forbid(unsafe_code)]
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

//! # dwork Services
//!
//! The marketplace components. Each module is one `BlockchainService` that owns a
//! disjoint key range; instances (workspaces, jobs) live in an arena keyed by their
//! derived address rather than as separate objects.

pub mod bank;
pub mod board;
pub mod dividends;
pub mod factory;
pub mod job;
pub mod link;
pub mod workspace;

#[cfg(test)]
pub(crate) mod test_support;

use dwork_api::services::BlockchainService;
use dwork_api::transaction::context::TxContext;
use dwork_types::error::TransactionError;

/// Looks up a sibling service by type.
pub(crate) fn sibling<'a, T: BlockchainService>(
    ctx: &TxContext<'a>,
    name: &str,
) -> Result<&'a T, TransactionError> {
    let services = ctx.services;
    services
        .get::<T>()
        .ok_or_else(|| TransactionError::Unsupported(format!("{} service is not registered", name)))
}
