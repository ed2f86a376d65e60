// Path: crates/api/src/ledger/mod.rs
//! The fungible-token ledger consumed by dividends and governance.
//!
//! Token mechanics live outside the marketplace. Services only see this interface,
//! which takes the same state handle as the calling service so that token movements
//! commit or roll back together with the call that caused them.

use crate::state::StateAccess;
use dwork_types::app::AccountId;
use dwork_types::error::TransactionError;

/// A standard fungible-token ledger.
pub trait TokenLedger: Send + Sync {
    /// Balance of `owner`.
    fn balance_of(&self, state: &dyn StateAccess, owner: &AccountId)
        -> Result<u128, TransactionError>;

    /// Total supply in circulation.
    fn total_supply(&self, state: &dyn StateAccess) -> Result<u128, TransactionError>;

    /// Amount `spender` may still pull from `owner`.
    fn allowance(
        &self,
        state: &dyn StateAccess,
        owner: &AccountId,
        spender: &AccountId,
    ) -> Result<u128, TransactionError>;

    /// Moves `amount` from `from` to `to`.
    fn transfer(
        &self,
        state: &mut dyn StateAccess,
        from: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError>;

    /// Moves `amount` from `owner` to `to` on behalf of `spender`, consuming allowance.
    fn transfer_from(
        &self,
        state: &mut dyn StateAccess,
        spender: &AccountId,
        owner: &AccountId,
        to: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError>;

    /// Sets the allowance of `spender` over `owner`'s tokens.
    fn approve(
        &self,
        state: &mut dyn StateAccess,
        owner: &AccountId,
        spender: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError>;

    /// Raises the allowance of `spender` over `owner`'s tokens.
    fn increase_allowance(
        &self,
        state: &mut dyn StateAccess,
        owner: &AccountId,
        spender: &AccountId,
        added: u128,
    ) -> Result<(), TransactionError> {
        let current = self.allowance(state, owner, spender)?;
        let next = current
            .checked_add(added)
            .ok_or(TransactionError::BalanceOverflow)?;
        self.approve(state, owner, spender, next)
    }

    /// Destroys `amount` of `owner`'s tokens.
    fn burn(
        &self,
        state: &mut dyn StateAccess,
        owner: &AccountId,
        amount: u128,
    ) -> Result<(), TransactionError>;
}
