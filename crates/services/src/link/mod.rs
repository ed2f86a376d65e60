// Path: crates/services/src/link/mod.rs
//! A public registry where an account lists the addresses it vouches for.

use dwork_api::state::{read_record, write_record, StateAccess};
use dwork_api::transaction::context::TxContext;
use dwork_macros::service_interface;
use dwork_types::app::{AccountId, LinkRecord, MarketEvent};
use dwork_types::error::{LinkError, StateError, TransactionError};
use dwork_types::keys::{LINK_HISTORY_PREFIX, LINK_RECORD_PREFIX};
use parity_scale_codec::{Decode, Encode};

#[derive(Encode, Decode, Debug, Clone)]
pub struct LinkParams {
    pub links: Vec<AccountId>,
}

#[derive(Default, Debug)]
pub struct LinkModule;

impl LinkModule {
    pub fn new() -> Self {
        Self
    }

    fn record_key(owner: &AccountId) -> Vec<u8> {
        [LINK_RECORD_PREFIX, owner.as_ref()].concat()
    }

    fn history_key(owner: &AccountId, index: u64) -> Vec<u8> {
        [LINK_HISTORY_PREFIX, owner.as_ref(), &index.to_be_bytes()].concat()
    }

    fn record<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        owner: &AccountId,
    ) -> Result<LinkRecord, StateError> {
        Ok(read_record(state, &Self::record_key(owner))?.unwrap_or_default())
    }

    /// The owner's current link set.
    pub fn links<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        owner: &AccountId,
    ) -> Result<Vec<AccountId>, StateError> {
        Ok(self.record(state, owner)?.links)
    }

    /// How many times the owner has published a link set.
    pub fn counter<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        owner: &AccountId,
    ) -> Result<u64, StateError> {
        Ok(self.record(state, owner)?.counter)
    }

    /// The `index`-th (1-based) link set the owner published.
    pub fn history<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        owner: &AccountId,
        index: u64,
    ) -> Result<Vec<AccountId>, TransactionError> {
        if index == 0 {
            return Err(LinkError::InvalidIndex.into());
        }
        read_record(state, &Self::history_key(owner, index))?
            .ok_or_else(|| LinkError::NotFound(index).into())
    }
}

#[service_interface(id = "link", abi_version = 1, state_schema = "v1")]
impl LinkModule {
    /// Replaces the signer's link set and appends it to their history. An empty set
    /// clears the current links.
    #[method]
    pub fn link(
        &self,
        state: &mut dyn StateAccess,
        params: LinkParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let owner = ctx.signer_account_id;
        let mut record = self.record(state, &owner)?;
        record.counter += 1;
        record.links = params.links;
        write_record(state, &Self::history_key(&owner, record.counter), &record.links)?;
        write_record(state, &Self::record_key(&owner), &record)?;
        ctx.emit(MarketEvent::Linked {
            owner,
            index: record.counter,
        });
        Ok(())
    }
}
