// Path: crates/types/src/keys/mod.rs
//! Defines constants for well-known state keys.
//!
//! Prefixes are followed by the raw 32 bytes of an `AccountId` and, where a record is
//! indexed, a little-endian `u64`. Prefixes of different record kinds never share a
//! leading segment, so a prefix scan over one kind never yields another.

/// Native currency balance, keyed by account.
pub const BANK_BALANCE_PREFIX: &[u8] = b"bank::balance::";

/// The single `FactoryState` record.
pub const FACTORY_STATE_KEY: &[u8] = b"factory::state";
/// Per-manager `WorkspaceRecord`, keyed by manager.
pub const FACTORY_MANAGER_PREFIX: &[u8] = b"factory::manager::";

/// `WorkspaceState`, keyed by workspace.
pub const WORKSPACE_STATE_PREFIX: &[u8] = b"ws::state::";
/// `Participant`, keyed by workspace then participant.
pub const WORKSPACE_MEMBER_PREFIX: &[u8] = b"ws::member::";
/// Outstanding invite codes, keyed by workspace then code bytes.
pub const WORKSPACE_INVITE_PREFIX: &[u8] = b"ws::invite::";
/// `WrittenContract`, keyed by workspace then hash.
pub const WORKSPACE_CONTRACT_PREFIX: &[u8] = b"ws::contract::";
/// `Vec<AccountId>` of job addresses, keyed by workspace then client.
pub const WORKSPACE_CLIENT_JOBS_PREFIX: &[u8] = b"ws::jobs::";

/// `JobRecord`, keyed by job.
pub const JOB_RECORD_PREFIX: &[u8] = b"job::record::";
/// Re-entrancy lock marker, keyed by job.
pub const JOB_LOCK_PREFIX: &[u8] = b"job::lock::";

/// The single `DividendsLedger` record.
pub const DIVIDENDS_LEDGER_KEY: &[u8] = b"dividends::ledger";
/// Number of claims per holder, keyed by holder.
pub const DIVIDENDS_CLAIM_COUNT_PREFIX: &[u8] = b"dividends::count::";
/// `DividendRecord`, keyed by holder then index.
pub const DIVIDENDS_RECORD_PREFIX: &[u8] = b"dividends::record::";

/// Number of proposals created.
pub const BOARD_PROPOSAL_COUNT_KEY: &[u8] = b"board::count";
/// `Proposal`, keyed by index.
pub const BOARD_PROPOSAL_PREFIX: &[u8] = b"board::proposal::";
/// Vote marker, keyed by index then voter.
pub const BOARD_VOTE_PREFIX: &[u8] = b"board::vote::";
/// Maintainer marker, keyed by account.
pub const BOARD_MAINTAINER_PREFIX: &[u8] = b"board::maintainer::";
/// Height of a creator's last proposal, keyed by creator.
pub const BOARD_LAST_PROPOSAL_PREFIX: &[u8] = b"board::last::";

/// `LinkRecord`, keyed by owner.
pub const LINK_RECORD_PREFIX: &[u8] = b"link::record::";
/// Historical link sets, keyed by owner then index.
pub const LINK_HISTORY_PREFIX: &[u8] = b"link::history::";
