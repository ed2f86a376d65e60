// Path: crates/types/src/app/board.rs
//! Governance proposals.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};

/// What a proposal changes when fulfilled.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub enum ProposalTopic {
    /// Sets the factory protocol fee.
    FeeChange {
        /// New fee in basis points.
        bps: u16,
    },
    /// Toggles the factory disable switch.
    FactoryDisable {
        /// New value of the switch.
        disabled: bool,
    },
    /// Adds a maintainer.
    MaintainerElect {
        /// The account to elect.
        who: AccountId,
    },
    /// Removes a maintainer.
    MaintainerRevoke {
        /// The account to revoke.
        who: AccountId,
    },
    /// Hands ownership of the dividends pool to another account.
    DividendsOwner {
        /// The new owner.
        new_owner: AccountId,
    },
}

impl ProposalTopic {
    /// Short label for events and logs.
    pub fn label(&self) -> &'static str {
        match self {
            ProposalTopic::FeeChange { .. } => "fee_change",
            ProposalTopic::FactoryDisable { .. } => "factory_disable",
            ProposalTopic::MaintainerElect { .. } => "maintainer_elect",
            ProposalTopic::MaintainerRevoke { .. } => "maintainer_revoke",
            ProposalTopic::DividendsOwner { .. } => "dividends_owner",
        }
    }
}

/// Derived proposal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProposalStatus {
    /// Accepting votes (or expired but not closed yet).
    Open,
    /// Voting closed and the proposal passed.
    Passed,
    /// Voting closed and the proposal failed.
    Failed,
    /// Passed and applied.
    Fulfilled,
}

/// A token-weighted proposal. Indexed from 1.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct Proposal {
    /// Sequential index.
    pub index: u64,
    /// The proposer.
    pub creator: AccountId,
    /// Off-chain rationale pointer.
    pub metadata_url: String,
    /// The change to apply.
    pub topic: ProposalTopic,
    /// Block height at creation.
    pub created_at: u64,
    /// Voting window length in blocks.
    pub expiry_blocks: u64,
    /// Token weight in favour.
    pub votes_for: u128,
    /// Token weight against.
    pub votes_against: u128,
    /// Set by `close_voting`.
    pub closed: bool,
    /// `votes_for > votes_against` at close.
    pub passed: bool,
    /// Set once the topic was applied.
    pub fulfilled: bool,
}

impl Proposal {
    /// The first height at which voting is over and closing is allowed.
    pub fn expires_at(&self) -> u64 {
        self.created_at.saturating_add(self.expiry_blocks)
    }

    /// Derived status.
    pub fn status(&self) -> ProposalStatus {
        match (self.closed, self.passed, self.fulfilled) {
            (_, _, true) => ProposalStatus::Fulfilled,
            (true, true, false) => ProposalStatus::Passed,
            (true, false, false) => ProposalStatus::Failed,
            (false, _, false) => ProposalStatus::Open,
        }
    }
}
