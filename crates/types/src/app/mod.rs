// Path: crates/types/src/app/mod.rs
//! Marketplace records persisted by the services.

/// Governance proposals.
pub mod board;
/// Dividends pool counters and claim records.
pub mod dividends;
/// The unified marketplace event type.
pub mod events;
/// Factory settings, template references, and per-manager history.
pub mod factory;
/// The canonical `AccountId` and address derivation.
pub mod identity;
/// The job escrow record and assignment state machine.
pub mod job;
/// Address-link registry entries.
pub mod link;
/// Workspace state, participants, and written contracts.
pub mod workspace;

pub use board::*;
pub use dividends::*;
pub use events::*;
pub use factory::*;
pub use identity::{content_hash, derive_address, AccountId};
pub use job::*;
pub use link::*;
pub use workspace::*;
