// Path: crates/api/src/transaction/context.rs
//! Defines the stable context for service execution.

use crate::services::access::ServiceDirectory;
use dwork_types::app::{AccountId, MarketEvent};
use dwork_types::error::TransactionError;

/// Maximum nesting of service-to-service calls and receive hooks within one call.
pub const MAX_CALL_DEPTH: u32 = 8;

/// Provides context to services during execution of a single call.
///
/// Unlike the block header fields, `signer_account_id` is not fixed for the whole call:
/// when one component calls another (the factory initializing a workspace, the board
/// fulfilling a proposal) the callee sees the calling component's account as the
/// signer, which is what its own authorization checks compare against.
pub struct TxContext<'a> {
    /// The current block height being processed.
    pub block_height: u64,
    /// The `AccountId` of the immediate caller. This is the authoritative source for
    /// permission checks within services.
    pub signer_account_id: AccountId,
    /// A read-only directory of available services.
    pub services: &'a ServiceDirectory,
    /// If true, the call is being simulated and its writes will be dropped.
    pub simulation: bool,
    /// Current nesting depth of cross-service calls.
    pub call_depth: u32,
    /// Events emitted so far. Dropped together with the state writes if the call fails.
    pub events: Vec<MarketEvent>,
}

impl<'a> TxContext<'a> {
    /// Creates a top-level context for a call signed by `signer`.
    pub fn new(block_height: u64, signer: AccountId, services: &'a ServiceDirectory) -> Self {
        Self {
            block_height,
            signer_account_id: signer,
            services,
            simulation: false,
            call_depth: 0,
            events: Vec::new(),
        }
    }

    /// Records an event.
    pub fn emit(&mut self, event: MarketEvent) {
        tracing::debug!(target: "events", event = event.name(), height = self.block_height);
        self.events.push(event);
    }

    /// Runs `f` with `caller` as the signer, one level deeper, then restores the
    /// previous signer regardless of the outcome.
    pub fn with_caller<R>(
        &mut self,
        caller: AccountId,
        f: impl FnOnce(&mut Self) -> Result<R, TransactionError>,
    ) -> Result<R, TransactionError> {
        if self.call_depth >= MAX_CALL_DEPTH {
            return Err(TransactionError::CallDepthExceeded);
        }
        let previous = std::mem::replace(&mut self.signer_account_id, caller);
        self.call_depth += 1;
        let result = f(self);
        self.call_depth -= 1;
        self.signer_account_id = previous;
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_caller_restores_signer_on_error() {
        let dir = ServiceDirectory::default();
        let outer = AccountId([1; 32]);
        let inner = AccountId([2; 32]);
        let mut ctx = TxContext::new(5, outer, &dir);

        let seen = ctx.with_caller(inner, |ctx| Ok(ctx.signer_account_id)).unwrap();
        assert_eq!(seen, inner);

        let res: Result<(), _> = ctx.with_caller(inner, |_| {
            Err(TransactionError::Unsupported("boom".into()))
        });
        assert!(res.is_err());
        assert_eq!(ctx.signer_account_id, outer);
        assert_eq!(ctx.call_depth, 0);
    }

    #[test]
    fn nesting_is_bounded() {
        let dir = ServiceDirectory::default();
        let mut ctx = TxContext::new(0, AccountId([1; 32]), &dir);
        ctx.call_depth = MAX_CALL_DEPTH;
        let res = ctx.with_caller(AccountId([2; 32]), |_| Ok(()));
        assert!(matches!(res, Err(TransactionError::CallDepthExceeded)));
    }
}
