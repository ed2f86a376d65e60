// Path: crates/types/src/app/dividends.rs
//! Records owned by the dividends pool.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};

/// Pool-wide running counters.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct DividendsLedger {
    /// Account allowed to recover stray tokens and transfer ownership.
    pub owner: AccountId,
    /// All native revenue ever received.
    pub total_received: u128,
    /// All native payouts ever made.
    pub total_paid: u128,
    /// Tokens currently locked in non-terminal claims.
    pub managed_tokens: u128,
}

impl DividendsLedger {
    /// A fresh ledger owned by `owner`.
    pub fn new(owner: AccountId) -> Self {
        Self {
            owner,
            total_received: 0,
            total_paid: 0,
            managed_tokens: 0,
        }
    }

    /// Revenue not yet paid out.
    pub fn current_balance(&self) -> u128 {
        self.total_received.saturating_sub(self.total_paid)
    }
}

/// Lifecycle of a claim record.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimState {
    /// Tokens are locked and the first payout was made.
    #[codec(index = 0)]
    Claimed,
    /// Tokens were returned with a second payout. Terminal.
    #[codec(index = 1)]
    Reclaimed,
    /// Tokens were returned without a second payout. Terminal.
    #[codec(index = 2)]
    Withdrawn,
}

/// One claim by one holder. Indexed per holder starting at 1.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct DividendRecord {
    /// Tokens locked by the claim.
    pub balance_locked: u128,
    /// Block height at which the lock started.
    pub lock_height_start: u64,
    /// Current lifecycle state.
    pub state: ClaimState,
    /// Always true for stored records.
    pub initialized: bool,
    /// Native amount paid when the claim was made.
    pub payout: u128,
}
