// Path: crates/api/src/lib.rs
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

//! # dwork API
//!
//! Core traits and interfaces shared by the marketplace services and the execution
//! layer: key-value state access with a copy-on-write overlay, the per-call
//! transaction context, the service trait and directory, and the token-ledger
//! collaborator interface.

/// State access traits and the transactional overlay.
pub mod state;
/// The per-call execution context.
pub mod transaction;
/// The service trait, capability hooks, and the service directory.
pub mod services;
/// The fungible-token ledger consumed by dividends and governance.
pub mod ledger;

/// Re-exports of the most commonly used items.
pub mod prelude {
    pub use crate::ledger::TokenLedger;
    pub use crate::services::access::ServiceDirectory;
    pub use crate::services::{BlockchainService, NativeReceiver};
    pub use crate::state::{StateAccess, StateOverlay};
    pub use crate::transaction::context::TxContext;
}
