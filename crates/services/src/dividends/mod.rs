// Path: crates/services/src/dividends/mod.rs
//! The dividends pool.
//!
//! Token holders lock tokens to draw a pro-rata share of the native revenue the pool has
//! received. Each claim opens a record that, after the lock window, can be closed either
//! by taking the tokens back (`withdraw_token`) or by taking them back together with a
//! second payout at the then-current ratio (`reclaim_dividends`).

use crate::bank;
use alloy_primitives::U256;
use dwork_api::ledger::TokenLedger;
use dwork_api::services::NativeReceiver;
use dwork_api::state::{read_record, read_u64, write_record, StateAccess};
use dwork_api::transaction::context::TxContext;
use dwork_macros::service_interface;
use dwork_types::app::{AccountId, ClaimState, DividendRecord, DividendsLedger, MarketEvent};
use dwork_types::error::{DividendsError, StateError, TransactionError};
use dwork_types::keys::{
    DIVIDENDS_CLAIM_COUNT_PREFIX, DIVIDENDS_LEDGER_KEY, DIVIDENDS_RECORD_PREFIX,
};
use dwork_types::service_configs::DividendsParams;
use parity_scale_codec::{Decode, Encode};
use std::fmt;
use std::sync::Arc;

/// `floor(amount * pool / supply)` over a 256-bit product. Token amounts carry 18
/// decimals, so the product routinely exceeds `u128` even when the quotient fits.
fn pro_rata(amount: u128, pool: u128, supply: u128) -> Option<u128> {
    let product = U256::from(amount) * U256::from(pool);
    let quotient = product.checked_div(U256::from(supply))?;
    u128::try_from(quotient).ok()
}

// --- Service Method Parameter Structs ---

#[derive(Encode, Decode, Debug, Clone)]
pub struct ClaimDividendsParams {
    pub amount: u128,
}

/// Names one of the signer's claim records (1-based).
#[derive(Encode, Decode, Debug, Clone)]
pub struct ClaimIndexParams {
    pub index: u64,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct WithdrawDifferenceParams {
    pub to: AccountId,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct TransferOwnershipParams {
    pub new_owner: AccountId,
}

// --- Dividends Module ---

pub struct DividendsModule {
    params: DividendsParams,
    token: Arc<dyn TokenLedger>,
}

impl fmt::Debug for DividendsModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DividendsModule")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl DividendsModule {
    pub fn new(params: DividendsParams, token: Arc<dyn TokenLedger>) -> Self {
        Self { params, token }
    }

    /// The pool's own account. Revenue is sent here and locked tokens are held here.
    pub fn address(&self) -> AccountId {
        self.params.address
    }

    fn count_key(holder: &AccountId) -> Vec<u8> {
        [DIVIDENDS_CLAIM_COUNT_PREFIX, holder.as_ref()].concat()
    }

    fn record_key(holder: &AccountId, index: u64) -> Vec<u8> {
        [
            DIVIDENDS_RECORD_PREFIX,
            holder.as_ref(),
            &index.to_be_bytes(),
        ]
        .concat()
    }

    fn store_ledger(
        &self,
        state: &mut dyn StateAccess,
        ledger: &DividendsLedger,
    ) -> Result<(), StateError> {
        write_record(state, DIVIDENDS_LEDGER_KEY, ledger)
    }

    /// `amount`'s share of the current balance, measured against the token supply.
    fn payout_for(
        &self,
        state: &dyn StateAccess,
        ledger: &DividendsLedger,
        amount: u128,
    ) -> Result<u128, TransactionError> {
        let supply = self.token.total_supply(state)?;
        if supply == 0 {
            return Ok(0);
        }
        pro_rata(amount, ledger.current_balance(), supply).ok_or(TransactionError::BalanceOverflow)
    }

    /// Loads a claim that is still open and whose lock window has passed.
    fn unlocked_claim(
        &self,
        state: &dyn StateAccess,
        holder: &AccountId,
        index: u64,
        height: u64,
    ) -> Result<DividendRecord, TransactionError> {
        if index == 0 {
            return Err(DividendsError::InvalidIndex.into());
        }
        let record = self
            .record(state, holder, index)?
            .filter(|r| r.initialized)
            .ok_or(DividendsError::NotFound(index))?;
        if record.state != ClaimState::Claimed {
            return Err(DividendsError::AlreadyFinalized.into());
        }
        let unlock_at = record
            .lock_height_start
            .saturating_add(self.params.lock_time_in_blocks);
        if height < unlock_at {
            return Err(DividendsError::BalanceLocked { unlock_at }.into());
        }
        Ok(record)
    }

    // --- Queries ---

    pub fn ledger<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<DividendsLedger, StateError> {
        Ok(read_record(state, DIVIDENDS_LEDGER_KEY)?
            .unwrap_or_else(|| DividendsLedger::new(self.params.owner)))
    }

    /// All revenue ever received.
    pub fn total_balance<S: StateAccess + ?Sized>(&self, state: &S) -> Result<u128, StateError> {
        Ok(self.ledger(state)?.total_received)
    }

    /// Revenue received minus payouts made.
    pub fn current_balance<S: StateAccess + ?Sized>(&self, state: &S) -> Result<u128, StateError> {
        Ok(self.ledger(state)?.current_balance())
    }

    /// Tokens locked by open claims.
    pub fn managed_tokens<S: StateAccess + ?Sized>(&self, state: &S) -> Result<u128, StateError> {
        Ok(self.ledger(state)?.managed_tokens)
    }

    pub fn owner<S: StateAccess + ?Sized>(&self, state: &S) -> Result<AccountId, StateError> {
        Ok(self.ledger(state)?.owner)
    }

    pub fn claim_count<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        holder: &AccountId,
    ) -> Result<u64, StateError> {
        read_u64(state, &Self::count_key(holder))
    }

    pub fn record<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        holder: &AccountId,
        index: u64,
    ) -> Result<Option<DividendRecord>, StateError> {
        read_record(state, &Self::record_key(holder, index))
    }
}

#[service_interface(
    id = "dividends",
    abi_version = 1,
    state_schema = "v1",
    capabilities = "NATIVE_RECEIVER"
)]
impl DividendsModule {
    /// Locks `amount` tokens from the signer and pays their share of the pool.
    ///
    /// The tokens are pulled through the signer's allowance to the pool.
    #[method]
    pub fn claim_dividends(
        &self,
        state: &mut dyn StateAccess,
        params: ClaimDividendsParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let holder = ctx.signer_account_id;
        let pool = self.params.address;
        let amount = params.amount;
        if amount == 0 {
            return Err(DividendsError::ZeroAmount.into());
        }
        let allowance = self.token.allowance(state, &holder, &pool)?;
        if allowance < amount {
            return Err(DividendsError::AllowanceInsufficient {
                allowance,
                requested: amount,
            }
            .into());
        }

        let mut ledger = self.ledger(state)?;
        let payout = self.payout_for(state, &ledger, amount)?;
        self.token
            .transfer_from(state, &pool, &holder, &pool, amount)?;

        let index = self.claim_count(state, &holder)? + 1;
        let record = DividendRecord {
            balance_locked: amount,
            lock_height_start: ctx.block_height,
            state: ClaimState::Claimed,
            initialized: true,
            payout,
        };
        ledger.total_paid = ledger
            .total_paid
            .checked_add(payout)
            .ok_or(TransactionError::BalanceOverflow)?;
        ledger.managed_tokens = ledger
            .managed_tokens
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        write_record(state, &Self::record_key(&holder, index), &record)?;
        state.insert(&Self::count_key(&holder), &index.to_le_bytes())?;
        self.store_ledger(state, &ledger)?;

        if payout > 0 {
            bank::transfer(state, ctx, pool, holder, payout)?;
        }
        tracing::info!(target: "dividends", %holder, index, amount, payout, "claim");
        ctx.emit(MarketEvent::Claim {
            holder,
            index,
            payout,
            amount,
        });
        Ok(())
    }

    /// Returns a claim's locked tokens without a second payout.
    #[method]
    pub fn withdraw_token(
        &self,
        state: &mut dyn StateAccess,
        params: ClaimIndexParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let holder = ctx.signer_account_id;
        let index = params.index;
        let mut record = self.unlocked_claim(state, &holder, index, ctx.block_height)?;
        let amount = record.balance_locked;

        let mut ledger = self.ledger(state)?;
        ledger.managed_tokens = ledger.managed_tokens.saturating_sub(amount);
        record.state = ClaimState::Withdrawn;
        write_record(state, &Self::record_key(&holder, index), &record)?;
        self.store_ledger(state, &ledger)?;

        self.token
            .transfer(state, &self.params.address, &holder, amount)?;
        ctx.emit(MarketEvent::TokenWithdraw {
            holder,
            index,
            amount,
        });
        Ok(())
    }

    /// Returns a claim's locked tokens and pays a second dividend at the current ratio.
    #[method]
    pub fn reclaim_dividends(
        &self,
        state: &mut dyn StateAccess,
        params: ClaimIndexParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let holder = ctx.signer_account_id;
        let pool = self.params.address;
        let index = params.index;
        let mut record = self.unlocked_claim(state, &holder, index, ctx.block_height)?;
        let amount = record.balance_locked;

        let mut ledger = self.ledger(state)?;
        let payout = self.payout_for(state, &ledger, amount)?;
        ledger.total_paid = ledger
            .total_paid
            .checked_add(payout)
            .ok_or(TransactionError::BalanceOverflow)?;
        ledger.managed_tokens = ledger.managed_tokens.saturating_sub(amount);
        record.state = ClaimState::Reclaimed;
        record.payout = record.payout.saturating_add(payout);
        write_record(state, &Self::record_key(&holder, index), &record)?;
        self.store_ledger(state, &ledger)?;

        self.token.transfer(state, &pool, &holder, amount)?;
        if payout > 0 {
            bank::transfer(state, ctx, pool, holder, payout)?;
        }
        tracing::info!(target: "dividends", %holder, index, amount, payout, "reclaim");
        ctx.emit(MarketEvent::Reclaim {
            holder,
            index,
            payout,
            amount,
        });
        Ok(())
    }

    /// Sends tokens held by the pool beyond the locked amount to `to`.
    #[method]
    pub fn withdraw_difference(
        &self,
        state: &mut dyn StateAccess,
        params: WithdrawDifferenceParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let ledger = self.ledger(state)?;
        if ctx.signer_account_id != ledger.owner {
            return Err(DividendsError::NotOwner.into());
        }
        if params.to.is_zero() {
            return Err(DividendsError::ZeroAddress.into());
        }
        let held = self.token.balance_of(state, &self.params.address)?;
        let stray = held.saturating_sub(ledger.managed_tokens);
        if stray == 0 {
            return Err(DividendsError::NothingToRecover.into());
        }
        self.token
            .transfer(state, &self.params.address, &params.to, stray)?;
        tracing::info!(target: "dividends", to = %params.to, stray, "recovered stray tokens");
        Ok(())
    }

    #[method]
    pub fn transfer_ownership(
        &self,
        state: &mut dyn StateAccess,
        params: TransferOwnershipParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ledger = self.ledger(state)?;
        if ctx.signer_account_id != ledger.owner {
            return Err(DividendsError::NotOwner.into());
        }
        if params.new_owner.is_zero() {
            return Err(DividendsError::ZeroAddress.into());
        }
        let previous = std::mem::replace(&mut ledger.owner, params.new_owner);
        self.store_ledger(state, &ledger)?;
        ctx.emit(MarketEvent::OwnershipTransferred {
            previous,
            new_owner: params.new_owner,
        });
        Ok(())
    }
}

impl NativeReceiver for DividendsModule {
    fn accepts(&self, _state: &dyn StateAccess, account: &AccountId) -> Result<bool, StateError> {
        Ok(*account == self.params.address)
    }

    fn on_receive(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext<'_>,
        from: AccountId,
        _to: AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        let mut ledger = self.ledger(state)?;
        ledger.total_received = ledger
            .total_received
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        self.store_ledger(state, &ledger)?;
        ctx.emit(MarketEvent::Received { from, amount });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bank::TransferParams;
    use crate::test_support::Harness;
    use dwork_test_utils::fixtures::{holder, owner, stranger, UNIT};
    use dwork_test_utils::{assert_code, assert_ok};

    const SUPPLY: u128 = 30_000_000 * UNIT;
    const POOL: u128 = 1000 * UNIT;

    /// A pool holding 1000 units of revenue and a 30M token supply, 10 of which belong
    /// to `holder(1)` and are approved to the pool.
    fn funded() -> (Harness, AccountId) {
        let mut h = Harness::new();
        let pool = h.query(|s, _| s.dividends.address());
        h.fund(&stranger(), POOL);
        assert_ok!(h.call(stranger(), |s, st, ctx| s.bank.transfer(
            st,
            TransferParams {
                to: pool,
                amount: POOL
            },
            ctx
        )));
        assert!(matches!(
            h.last_events().last(),
            Some(MarketEvent::Received { amount, .. }) if *amount == POOL
        ));
        h.mint_tokens(&holder(1), 10 * UNIT);
        h.mint_tokens(&holder(2), SUPPLY - 10 * UNIT);
        h.approve(&holder(1), &pool, 10 * UNIT);
        (h, pool)
    }

    fn claim(h: &mut Harness, who: AccountId, amount: u128) -> Result<(), TransactionError> {
        h.call(who, |s, st, ctx| {
            s.dividends
                .claim_dividends(st, ClaimDividendsParams { amount }, ctx)
        })
    }

    fn finish(
        h: &mut Harness,
        who: AccountId,
        index: u64,
        reclaim: bool,
    ) -> Result<(), TransactionError> {
        h.call(who, |s, st, ctx| {
            let params = ClaimIndexParams { index };
            if reclaim {
                s.dividends.reclaim_dividends(st, params, ctx)
            } else {
                s.dividends.withdraw_token(st, params, ctx)
            }
        })
    }

    #[test]
    fn claim_pays_share_of_pool_against_supply() {
        let (mut h, pool) = funded();
        assert_ok!(claim(&mut h, holder(1), 10 * UNIT));

        let payout = 333_333_333_333_333;
        assert_eq!(h.native(&holder(1)), payout);
        assert_eq!(h.native(&pool), POOL - payout);
        assert_eq!(h.tokens(&holder(1)), 0);
        assert_eq!(h.tokens(&pool), 10 * UNIT);
        assert_eq!(h.query(|s, st| s.dividends.managed_tokens(st)).unwrap(), 10 * UNIT);
        assert_eq!(h.query(|s, st| s.dividends.total_balance(st)).unwrap(), POOL);
        assert_eq!(
            h.query(|s, st| s.dividends.current_balance(st)).unwrap(),
            POOL - payout
        );
        assert_eq!(h.query(|s, st| s.dividends.claim_count(st, &holder(1))).unwrap(), 1);
        let record = h
            .query(|s, st| s.dividends.record(st, &holder(1), 1))
            .unwrap()
            .unwrap();
        assert_eq!(record.state, ClaimState::Claimed);
        assert_eq!(record.lock_height_start, h.height);
        assert!(matches!(
            h.last_events().last(),
            Some(MarketEvent::Claim { index: 1, payout: p, .. }) if *p == payout
        ));
    }

    #[test]
    fn claim_rejects_zero_and_unapproved_amounts() {
        let (mut h, _) = funded();
        assert_code!(claim(&mut h, holder(1), 0), "700");
        assert_code!(claim(&mut h, holder(1), 11 * UNIT), "701");
        assert_code!(claim(&mut h, holder(2), UNIT), "701");
    }

    #[test]
    fn lock_window_opens_exactly_at_the_boundary() {
        let (mut h, pool) = funded();
        assert_ok!(claim(&mut h, holder(1), 10 * UNIT));
        h.advance(99);
        assert_code!(finish(&mut h, holder(1), 1, false), "705");
        h.advance(1);
        assert_ok!(finish(&mut h, holder(1), 1, false));

        assert_eq!(h.tokens(&holder(1)), 10 * UNIT);
        assert_eq!(h.tokens(&pool), 0);
        assert_eq!(h.query(|s, st| s.dividends.managed_tokens(st)).unwrap(), 0);
        assert_code!(finish(&mut h, holder(1), 1, true), "704");
        assert_code!(finish(&mut h, holder(1), 1, false), "704");
    }

    #[test]
    fn pro_rata_keeps_the_wide_product() {
        assert_eq!(pro_rata(10, 1000, 30), Some(333));
        assert_eq!(pro_rata(5, 7, 0), None);
        // 10 tokens against a 1000-unit pool and 30M supply.
        assert_eq!(
            pro_rata(10 * UNIT, 1000 * UNIT, 30_000_000 * UNIT),
            Some(333_333_333_333_333)
        );
        assert_eq!(pro_rata(u128::MAX, u128::MAX, u128::MAX), Some(u128::MAX));
        assert_eq!(pro_rata(u128::MAX, 3, 2), None);
    }

    #[test]
    fn claim_indexes_are_validated() {
        let (mut h, _) = funded();
        assert_ok!(claim(&mut h, holder(1), 10 * UNIT));
        assert_code!(finish(&mut h, holder(1), 0, true), "702");
        assert_code!(finish(&mut h, holder(1), 2, true), "703");
        assert_code!(finish(&mut h, holder(2), 1, true), "703");
    }

    #[test]
    fn reclaim_pays_again_at_the_current_ratio() {
        let (mut h, _) = funded();
        assert_ok!(claim(&mut h, holder(1), 10 * UNIT));
        let first = h.native(&holder(1));
        h.advance(100);
        assert_ok!(finish(&mut h, holder(1), 1, true));

        let second = pro_rata(10 * UNIT, POOL - first, SUPPLY).unwrap();
        assert!(second > 0 && second < first);
        assert_eq!(h.native(&holder(1)), first + second);
        assert_eq!(h.tokens(&holder(1)), 10 * UNIT);
        let record = h
            .query(|s, st| s.dividends.record(st, &holder(1), 1))
            .unwrap()
            .unwrap();
        assert_eq!(record.state, ClaimState::Reclaimed);
        assert_eq!(record.payout, first + second);
        assert_code!(finish(&mut h, holder(1), 1, false), "704");
    }

    #[test]
    fn stray_tokens_can_be_recovered_by_the_owner() {
        let (mut h, pool) = funded();
        assert_ok!(claim(&mut h, holder(1), 10 * UNIT));
        h.token
            .transfer(&mut h.store, &holder(2), &pool, 5 * UNIT)
            .unwrap();

        let recover = |h: &mut Harness, who| {
            h.call(who, |s, st, ctx| {
                s.dividends.withdraw_difference(
                    st,
                    WithdrawDifferenceParams { to: stranger() },
                    ctx,
                )
            })
        };
        assert_code!(recover(&mut h, stranger()), "706");
        assert_ok!(recover(&mut h, owner()));
        assert_eq!(h.tokens(&stranger()), 5 * UNIT);
        assert_eq!(h.tokens(&pool), 10 * UNIT);
        assert_code!(recover(&mut h, owner()), "707");
    }

    #[test]
    fn ownership_transfer_moves_owner_rights() {
        let (mut h, _) = funded();
        let transfer = |h: &mut Harness, who, new_owner| {
            h.call(who, |s, st, ctx| {
                s.dividends
                    .transfer_ownership(st, TransferOwnershipParams { new_owner }, ctx)
            })
        };
        assert_code!(transfer(&mut h, owner(), AccountId::ZERO), "500");
        assert_ok!(transfer(&mut h, owner(), holder(3)));
        assert_eq!(h.query(|s, st| s.dividends.owner(st)).unwrap(), holder(3));
        assert_code!(transfer(&mut h, owner(), holder(4)), "706");
    }
}
