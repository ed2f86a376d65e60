// Path: crates/services/src/board/mod.rs
//! Token-weighted governance over the factory and the dividends pool.
//!
//! Proposals are created by holders with enough shares, voted on with live token
//! balances, closed by anyone after expiry, and applied by a maintainer. Application
//! calls the target service as the board's own account, so the target's usual
//! authorization checks decide whether the board may make the change.

use crate::dividends::{DividendsModule, TransferOwnershipParams};
use crate::factory::{FactoryModule, SetContractFeeParams, SetDisabledParams};
use crate::sibling;
use dwork_api::ledger::TokenLedger;
use dwork_api::state::{read_record, read_u64, write_record, StateAccess};
use dwork_api::transaction::context::TxContext;
use dwork_macros::service_interface;
use dwork_types::app::{AccountId, MarketEvent, Proposal, ProposalTopic};
use dwork_types::error::{BoardError, StateError, TransactionError};
use dwork_types::keys::{
    BOARD_LAST_PROPOSAL_PREFIX, BOARD_MAINTAINER_PREFIX, BOARD_PROPOSAL_COUNT_KEY,
    BOARD_PROPOSAL_PREFIX, BOARD_VOTE_PREFIX,
};
use dwork_types::service_configs::BoardParams;
use parity_scale_codec::{Decode, Encode};
use std::fmt;
use std::sync::Arc;

// --- Service Method Parameter Structs ---

#[derive(Encode, Decode, Debug, Clone)]
pub struct CreateProposalParams {
    pub metadata_url: String,
    pub topic: ProposalTopic,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct VoteParams {
    pub index: u64,
    pub support: bool,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct ProposalIndexParams {
    pub index: u64,
}

// --- Board Module ---

pub struct BoardModule {
    params: BoardParams,
    token: Arc<dyn TokenLedger>,
}

impl fmt::Debug for BoardModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoardModule")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl BoardModule {
    pub fn new(params: BoardParams, token: Arc<dyn TokenLedger>) -> Self {
        Self { params, token }
    }

    /// The board's own account, used as the caller when proposals are applied.
    pub fn address(&self) -> AccountId {
        self.params.address
    }

    fn proposal_key(index: u64) -> Vec<u8> {
        [BOARD_PROPOSAL_PREFIX, &index.to_be_bytes()].concat()
    }

    fn vote_key(index: u64, voter: &AccountId) -> Vec<u8> {
        [BOARD_VOTE_PREFIX, &index.to_be_bytes(), voter.as_ref()].concat()
    }

    fn maintainer_key(who: &AccountId) -> Vec<u8> {
        [BOARD_MAINTAINER_PREFIX, who.as_ref()].concat()
    }

    fn last_proposal_key(creator: &AccountId) -> Vec<u8> {
        [BOARD_LAST_PROPOSAL_PREFIX, creator.as_ref()].concat()
    }

    fn store(&self, state: &mut dyn StateAccess, proposal: &Proposal) -> Result<(), StateError> {
        write_record(state, &Self::proposal_key(proposal.index), proposal)
    }

    /// Seeds the first maintainer.
    pub fn genesis(&self, state: &mut dyn StateAccess) -> Result<(), StateError> {
        if self.params.initial_maintainer.is_zero() {
            log::warn!("board genesis without a maintainer; proposals can never be applied");
            return Ok(());
        }
        state.insert(&Self::maintainer_key(&self.params.initial_maintainer), &[1])
    }

    fn set_maintainer(
        &self,
        state: &mut dyn StateAccess,
        who: &AccountId,
        active: bool,
    ) -> Result<(), TransactionError> {
        if who.is_zero() {
            return Err(BoardError::ZeroAddress.into());
        }
        if active {
            state.insert(&Self::maintainer_key(who), &[1])?;
            return Ok(());
        }
        if !self.is_maintainer(state, who)? {
            return Err(BoardError::NotAMaintainer.into());
        }
        if self.maintainers(state)?.len() <= 1 {
            return Err(BoardError::LastMaintainer.into());
        }
        state.delete(&Self::maintainer_key(who))?;
        Ok(())
    }

    // --- Queries ---

    pub fn is_maintainer<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        who: &AccountId,
    ) -> Result<bool, StateError> {
        Ok(state.get(&Self::maintainer_key(who))?.is_some())
    }

    /// The current maintainer set in address order.
    pub fn maintainers<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<Vec<AccountId>, StateError> {
        let mut out = Vec::new();
        for item in state.prefix_scan(BOARD_MAINTAINER_PREFIX)? {
            let (key, _) = item?;
            let who: [u8; 32] = key
                .get(BOARD_MAINTAINER_PREFIX.len()..)
                .and_then(|tail| tail.try_into().ok())
                .ok_or_else(|| StateError::InvalidValue("malformed maintainer key".into()))?;
            out.push(AccountId(who));
        }
        Ok(out)
    }

    pub fn proposal_count<S: StateAccess + ?Sized>(&self, state: &S) -> Result<u64, StateError> {
        read_u64(state, BOARD_PROPOSAL_COUNT_KEY)
    }

    pub fn proposal<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        index: u64,
    ) -> Result<Proposal, TransactionError> {
        read_record(state, &Self::proposal_key(index))?
            .ok_or_else(|| BoardError::NotFound(index).into())
    }

    pub fn has_voted<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        index: u64,
        voter: &AccountId,
    ) -> Result<bool, StateError> {
        Ok(state.get(&Self::vote_key(index, voter))?.is_some())
    }
}

#[service_interface(id = "board", abi_version = 1, state_schema = "v1")]
impl BoardModule {
    #[method]
    pub fn create_proposal(
        &self,
        state: &mut dyn StateAccess,
        params: CreateProposalParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let creator = ctx.signer_account_id;
        let height = ctx.block_height;
        match &params.topic {
            ProposalTopic::MaintainerElect { who } | ProposalTopic::MaintainerRevoke { who }
                if who.is_zero() =>
            {
                return Err(BoardError::ZeroAddress.into())
            }
            ProposalTopic::DividendsOwner { new_owner } if new_owner.is_zero() => {
                return Err(BoardError::ZeroAddress.into())
            }
            _ => {}
        }
        let have = self.token.balance_of(state, &creator)?;
        if have < self.params.min_share {
            return Err(BoardError::InsufficientShares {
                have,
                need: self.params.min_share,
            }
            .into());
        }
        let last: Option<u64> = read_record(state, &Self::last_proposal_key(&creator))?;
        if let Some(last) = last {
            let next_allowed = last.saturating_add(self.params.rate_limit_blocks);
            if height < next_allowed {
                return Err(BoardError::RateLimited { next_allowed }.into());
            }
        }

        let index = self.proposal_count(state)? + 1;
        let topic = params.topic.label().to_string();
        let proposal = Proposal {
            index,
            creator,
            metadata_url: params.metadata_url,
            topic: params.topic,
            created_at: height,
            expiry_blocks: self.params.expiry_blocks,
            votes_for: 0,
            votes_against: 0,
            closed: false,
            passed: false,
            fulfilled: false,
        };
        self.store(state, &proposal)?;
        state.insert(BOARD_PROPOSAL_COUNT_KEY, &index.to_le_bytes())?;
        write_record(state, &Self::last_proposal_key(&creator), &height)?;
        log::info!("proposal {} ({}) created by {}", index, topic, creator);
        ctx.emit(MarketEvent::ProposalCreated {
            index,
            creator,
            topic,
        });
        Ok(())
    }

    /// Votes with the signer's live token balance.
    #[method]
    pub fn vote(
        &self,
        state: &mut dyn StateAccess,
        params: VoteParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let voter = ctx.signer_account_id;
        let mut proposal = self.proposal(state, params.index)?;
        if self.has_voted(state, params.index, &voter)? {
            return Err(BoardError::AlreadyVoted.into());
        }
        if proposal.closed {
            return Err(BoardError::VotingClosed.into());
        }
        // Voting stops at the first height at which closing is allowed.
        if ctx.block_height >= proposal.expires_at() {
            return Err(BoardError::Expired.into());
        }
        let weight = self.token.balance_of(state, &voter)?;
        if weight == 0 {
            return Err(BoardError::NoVotingPower.into());
        }
        let tally = if params.support {
            &mut proposal.votes_for
        } else {
            &mut proposal.votes_against
        };
        *tally = tally
            .checked_add(weight)
            .ok_or(TransactionError::BalanceOverflow)?;
        self.store(state, &proposal)?;
        state.insert(&Self::vote_key(params.index, &voter), &[u8::from(params.support)])?;
        log::debug!(
            "vote on {} by {}: support={} weight={}",
            params.index,
            voter,
            params.support,
            weight
        );
        ctx.emit(MarketEvent::Vote {
            index: params.index,
            voter,
            support: params.support,
            weight,
        });
        Ok(())
    }

    /// Closes an expired proposal. A tie fails.
    #[method]
    pub fn close_voting(
        &self,
        state: &mut dyn StateAccess,
        params: ProposalIndexParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut proposal = self.proposal(state, params.index)?;
        if proposal.closed {
            return Err(BoardError::AlreadyClosed.into());
        }
        let expires_at = proposal.expires_at();
        if ctx.block_height < expires_at {
            return Err(BoardError::NotYetExpired { expires_at }.into());
        }
        proposal.closed = true;
        proposal.passed = proposal.votes_for > proposal.votes_against;
        self.store(state, &proposal)?;
        log::info!(
            "proposal {} closed: for={} against={} passed={}",
            proposal.index,
            proposal.votes_for,
            proposal.votes_against,
            proposal.passed
        );
        ctx.emit(MarketEvent::VotingClosed {
            index: params.index,
            passed: proposal.passed,
        });
        Ok(())
    }

    /// Applies a passed proposal. Maintainer-only.
    #[method]
    pub fn fulfill_proposal(
        &self,
        state: &mut dyn StateAccess,
        params: ProposalIndexParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        if !self.is_maintainer(state, &ctx.signer_account_id)? {
            return Err(BoardError::NotMaintainer.into());
        }
        let mut proposal = self.proposal(state, params.index)?;
        if proposal.fulfilled {
            return Err(BoardError::AlreadyFulfilled.into());
        }
        if !(proposal.closed && proposal.passed) {
            return Err(BoardError::NotAccepted.into());
        }
        proposal.fulfilled = true;
        self.store(state, &proposal)?;

        let board = self.params.address;
        match proposal.topic {
            ProposalTopic::FeeChange { bps } => {
                let factory = sibling::<FactoryModule>(ctx, "factory")?;
                ctx.with_caller(board, |ctx| {
                    factory.set_contract_fee(state, SetContractFeeParams { bps }, ctx)
                })?;
            }
            ProposalTopic::FactoryDisable { disabled } => {
                let factory = sibling::<FactoryModule>(ctx, "factory")?;
                ctx.with_caller(board, |ctx| {
                    factory.set_disabled(state, SetDisabledParams { disabled }, ctx)
                })?;
            }
            ProposalTopic::MaintainerElect { who } => {
                self.set_maintainer(state, &who, true)?;
                ctx.emit(MarketEvent::MaintainerChanged { who, active: true });
            }
            ProposalTopic::MaintainerRevoke { who } => {
                self.set_maintainer(state, &who, false)?;
                ctx.emit(MarketEvent::MaintainerChanged { who, active: false });
            }
            ProposalTopic::DividendsOwner { new_owner } => {
                let dividends = sibling::<DividendsModule>(ctx, "dividends")?;
                ctx.with_caller(board, |ctx| {
                    dividends.transfer_ownership(state, TransferOwnershipParams { new_owner }, ctx)
                })?;
            }
        }
        log::info!("proposal {} fulfilled", params.index);
        ctx.emit(MarketEvent::ProposalFulfilled {
            index: params.index,
        });
        Ok(())
    }
}
