// Path: crates/services/src/bank/mod.rs
//! Native currency balances and the receive hook.

use dwork_api::state::{read_u128, StateAccess};
use dwork_api::transaction::context::{TxContext, MAX_CALL_DEPTH};
use dwork_macros::service_interface;
use dwork_types::app::AccountId;
use dwork_types::error::{StateError, TransactionError};
use dwork_types::keys::BANK_BALANCE_PREFIX;
use parity_scale_codec::{Decode, Encode};

/// Parameters for `transfer@v1`.
#[derive(Encode, Decode, Debug, Clone)]
pub struct TransferParams {
    pub to: AccountId,
    pub amount: u128,
}

fn balance_key(account: &AccountId) -> Vec<u8> {
    [BANK_BALANCE_PREFIX, account.as_ref()].concat()
}

/// Native balance of `account`.
pub fn balance_of<S: StateAccess + ?Sized>(
    state: &S,
    account: &AccountId,
) -> Result<u128, StateError> {
    read_u128(state, &balance_key(account))
}

fn write_balance(
    state: &mut dyn StateAccess,
    account: &AccountId,
    amount: u128,
) -> Result<(), StateError> {
    state.insert(&balance_key(account), &amount.to_le_bytes())
}

/// Creates `amount` of native currency for `account`. Used at genesis.
pub fn mint(
    state: &mut dyn StateAccess,
    account: &AccountId,
    amount: u128,
) -> Result<(), TransactionError> {
    let next = balance_of(state, account)?
        .checked_add(amount)
        .ok_or(TransactionError::BalanceOverflow)?;
    write_balance(state, account, next)?;
    Ok(())
}

/// Moves native currency and then runs the recipient's receive hook, if any.
///
/// Both balances are final before the hook runs, so a hook that calls back into the
/// sender observes the post-transfer state.
pub fn transfer(
    state: &mut dyn StateAccess,
    ctx: &mut TxContext<'_>,
    from: AccountId,
    to: AccountId,
    amount: u128,
) -> Result<(), TransactionError> {
    if to.is_zero() {
        return Err(TransactionError::Invalid("transfer to the zero address".into()));
    }
    let have = balance_of(state, &from)?;
    if have < amount {
        return Err(TransactionError::InsufficientFunds);
    }
    write_balance(state, &from, have - amount)?;
    let credited = balance_of(state, &to)?
        .checked_add(amount)
        .ok_or(TransactionError::BalanceOverflow)?;
    write_balance(state, &to, credited)?;
    tracing::debug!(target: "bank", %from, %to, amount, "transfer");

    let services = ctx.services;
    for service in services.services() {
        let Some(receiver) = service.as_native_receiver() else {
            continue;
        };
        if !receiver.accepts(state, &to)? {
            continue;
        }
        if ctx.call_depth >= MAX_CALL_DEPTH {
            return Err(TransactionError::CallDepthExceeded);
        }
        ctx.call_depth += 1;
        let result = receiver.on_receive(state, ctx, from, to, amount);
        ctx.call_depth -= 1;
        return result;
    }
    Ok(())
}

/// The native currency ledger.
#[derive(Default, Debug)]
pub struct BankModule;

impl BankModule {
    pub fn new() -> Self {
        Self
    }
}

#[service_interface(id = "bank", abi_version = 1, state_schema = "v1")]
impl BankModule {
    /// Sends native currency from the signer to `to`.
    #[method]
    pub fn transfer(
        &self,
        state: &mut dyn StateAccess,
        params: TransferParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let from = ctx.signer_account_id;
        transfer(state, ctx, from, params.to, params.amount)
    }
}
