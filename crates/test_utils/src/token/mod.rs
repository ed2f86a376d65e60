//! A state-backed token ledger standing in for the external ERC-20 contract

use dwork_api::ledger::TokenLedger;
use dwork_api::state::{read_u128, StateAccess};
use dwork_types::app::AccountId;
use dwork_types::error::{TokenError, TransactionError};

const TOKEN_BALANCE_PREFIX: &[u8] = b"token::balance::";
const TOKEN_ALLOWANCE_PREFIX: &[u8] = b"token::allowance::";
const TOKEN_SUPPLY_KEY: &[u8] = b"token::supply";

fn balance_key(owner: &AccountId) -> Vec<u8> {
    [TOKEN_BALANCE_PREFIX, owner.as_ref()].concat()
}

fn allowance_key(owner: &AccountId, spender: &AccountId) -> Vec<u8> {
    [TOKEN_ALLOWANCE_PREFIX, owner.as_ref(), spender.as_ref()].concat()
}

fn write_amount(
    state: &mut dyn StateAccess,
    key: &[u8],
    amount: u128,
) -> Result<(), TransactionError> {
    state.insert(key, &amount.to_le_bytes())?;
    Ok(())
}

/// Minimal fungible token. Balances, allowances and supply live in the same state as the
/// marketplace, so token movements roll back with the call that made them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LedgerToken;

impl LedgerToken {
    /// Creates the ledger.
    pub fn new() -> Self {
        Self
    }

    /// Creates `amount` new tokens for `to`.
    pub fn mint(
        &self,
        state: &mut dyn StateAccess,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        let supply = read_u128(state, TOKEN_SUPPLY_KEY)?
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        let balance = read_u128(state, &balance_key(to))?
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        write_amount(state, TOKEN_SUPPLY_KEY, supply)?;
        write_amount(state, &balance_key(to), balance)
    }
}

impl TokenLedger for LedgerToken {
    fn balance_of(
        &self,
        state: &dyn StateAccess,
        owner: &AccountId,
    ) -> Result<u128, TransactionError> {
        Ok(read_u128(state, &balance_key(owner))?)
    }

    fn total_supply(&self, state: &dyn StateAccess) -> Result<u128, TransactionError> {
        Ok(read_u128(state, TOKEN_SUPPLY_KEY)?)
    }

    fn allowance(
        &self,
        state: &dyn StateAccess,
        owner: &AccountId,
        spender: &AccountId,
    ) -> Result<u128, TransactionError> {
        Ok(read_u128(state, &allowance_key(owner, spender))?)
    }

    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        let have = read_u128(state, &balance_key(from))?;
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount }.into());
        }
        write_amount(state, &balance_key(from), have - amount)?;
        let credited = read_u128(state, &balance_key(to))?
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        write_amount(state, &balance_key(to), credited)
    }

    fn transfer_from(
        &self,
        state: &mut dyn StateAccess,
        spender: &AccountId,
        owner: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        let allowed = self.allowance(state, owner, spender)?;
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                have: allowed,
                need: amount,
            }
            .into());
        }
        self.transfer(state, owner, to, amount)?;
        write_amount(state, &allowance_key(owner, spender), allowed - amount)
    }

    fn approve(
        &self,
        state: &mut dyn StateAccess,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        write_amount(state, &allowance_key(owner, spender), amount)
    }

    fn burn(
        &self,
        state: &mut dyn StateAccess,
        owner: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        let have = read_u128(state, &balance_key(owner))?;
        if have < amount {
            return Err(TokenError::InsufficientBalance { have, need: amount }.into());
        }
        let supply = read_u128(state, TOKEN_SUPPLY_KEY)?.saturating_sub(amount);
        write_amount(state, &balance_key(owner), have - amount)?;
        write_amount(state, TOKEN_SUPPLY_KEY, supply)
    }
}
