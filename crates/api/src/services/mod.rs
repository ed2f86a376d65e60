// Path: crates/api/src/services/mod.rs
//! Traits for pluggable marketplace services.

use crate::state::StateAccess;
use crate::transaction::context::TxContext;
use async_trait::async_trait;
use dwork_types::app::AccountId;
use dwork_types::error::{StateError, TransactionError};
use dwork_types::service_configs::Capabilities;
use std::any::Any;

pub mod access;

/// The base trait for any service managed by the marketplace.
///
/// Services own disjoint key prefixes (see `dwork_types::keys`) and never touch another
/// service's keys directly; cross-component effects go through the other service's
/// methods, looked up in the `ServiceDirectory`.
#[async_trait]
pub trait BlockchainService: Any + Send + Sync {
    /// A unique, static, lowercase string identifier for the service.
    /// This is used for deterministic ordering and for dispatching calls.
    fn id(&self) -> &str;

    /// The version of the ABI the service expects from the host.
    fn abi_version(&self) -> u32;

    /// A string identifying the schema of the state this service reads/writes.
    fn state_schema(&self) -> &str;

    /// Returns a bitmask of the capability hooks this service implements.
    fn capabilities(&self) -> Capabilities;

    /// Provides access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Handles a dispatched `"<method>@v1"` call with SCALE-encoded parameters.
    ///
    /// # Default Implementation
    /// The default implementation returns an `Unsupported` error.
    async fn handle_service_call(
        &self,
        state: &mut dyn StateAccess,
        method: &str,
        params: &[u8],
        ctx: &mut TxContext<'_>,
    ) -> Result<(), TransactionError> {
        let _ = (state, params, ctx);
        Err(TransactionError::Unsupported(format!(
            "Service '{}' does not implement the method '{}'",
            self.id(),
            method
        )))
    }

    /// Attempts to downcast this service to a `NativeReceiver` trait object.
    fn as_native_receiver(&self) -> Option<&dyn NativeReceiver> {
        None
    }
}

/// A receive hook for native-currency transfers.
///
/// After a transfer has debited the sender and credited the recipient, the bank offers
/// the transfer to each receiver in directory order; the first one that `accepts` the
/// recipient address runs `on_receive`. An error from the hook aborts the whole call.
pub trait NativeReceiver: Send + Sync {
    /// Whether this service handles transfers to `account`.
    fn accepts(&self, state: &dyn StateAccess, account: &AccountId) -> Result<bool, StateError>;

    /// Reacts to `amount` having been credited to `to`.
    fn on_receive(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext<'_>,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), TransactionError>;
}
