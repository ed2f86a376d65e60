// Path: crates/services/src/factory/mod.rs
//! The registry factory: versioned templates, workspace minting, and the protocol fee.

use crate::sibling;
use crate::workspace::{InitializeWorkspaceParams, WorkspaceModule};
use dwork_api::state::{read_record, write_record, StateAccess};
use dwork_api::transaction::context::TxContext;
use dwork_macros::service_interface;
use dwork_types::app::{
    derive_address, AccountId, FactoryState, LibraryRef, MarketEvent, WorkspaceRecord,
};
use dwork_types::error::{FactoryError, StateError, TransactionError};
use dwork_types::keys::{FACTORY_MANAGER_PREFIX, FACTORY_STATE_KEY};
use dwork_types::service_configs::FactoryParams;
use parity_scale_codec::{Decode, Encode};

// --- Service Method Parameter Structs ---

#[derive(Encode, Decode, Debug, Clone)]
pub struct CreateWorkSpaceParams {
    pub fee_bps: u16,
    pub metadata_url: String,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetLibraryParams {
    pub address: AccountId,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetContractFeeParams {
    pub bps: u16,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetDisabledParams {
    pub disabled: bool,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetAddressParams {
    pub address: AccountId,
}

// --- Factory Module ---

#[derive(Default, Debug)]
pub struct FactoryModule {
    params: FactoryParams,
}

impl FactoryModule {
    pub fn new(params: FactoryParams) -> Self {
        Self { params }
    }

    /// The factory's own account, which workspaces accept `initialize` from.
    pub fn address(&self) -> AccountId {
        self.params.address
    }

    pub fn params(&self) -> &FactoryParams {
        &self.params
    }

    fn manager_key(manager: &AccountId) -> Vec<u8> {
        [FACTORY_MANAGER_PREFIX, manager.as_ref()].concat()
    }

    fn initial_state(&self) -> FactoryState {
        FactoryState {
            owner: self.params.owner,
            board: None,
            dividends: None,
            contract_fee_bps: self.params.contract_fee_bps,
            disabled: false,
            workspace_library: None,
            job_library: None,
            workspace_count: 0,
        }
    }

    /// Current factory state. Before the first write this is derived from the params.
    pub fn load<S: StateAccess + ?Sized>(&self, state: &S) -> Result<FactoryState, StateError> {
        Ok(read_record(state, FACTORY_STATE_KEY)?.unwrap_or_else(|| self.initial_state()))
    }

    fn store(&self, state: &mut dyn StateAccess, fs: &FactoryState) -> Result<(), StateError> {
        write_record(state, FACTORY_STATE_KEY, fs)
    }

    /// Writes the initial factory state.
    pub fn genesis(&self, state: &mut dyn StateAccess) -> Result<(), StateError> {
        let fs = self.initial_state();
        self.store(state, &fs)
    }

    fn ensure_owner_or_board(fs: &FactoryState, caller: &AccountId) -> Result<(), FactoryError> {
        if *caller == fs.owner || fs.board.as_ref() == Some(caller) {
            Ok(())
        } else {
            Err(FactoryError::NotOwner)
        }
    }

    // --- Queries ---

    pub fn workspace_record<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        manager: &AccountId,
    ) -> Result<Option<WorkspaceRecord>, StateError> {
        read_record(state, &Self::manager_key(manager))
    }

    /// Number of workspaces `manager` has created. 0 if none.
    pub fn current_workspace_index<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        manager: &AccountId,
    ) -> Result<u64, StateError> {
        Ok(self
            .workspace_record(state, manager)?
            .map(|r| r.current_index())
            .unwrap_or(0))
    }

    /// The `index`-th (1-based) workspace created by `manager`.
    pub fn historic_workspace<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        index: u64,
        manager: &AccountId,
    ) -> Result<AccountId, TransactionError> {
        self.workspace_record(state, manager)?
            .and_then(|r| r.at(index))
            .ok_or_else(|| FactoryError::WorkspaceNotFound.into())
    }

    /// The live workspace of `manager`.
    pub fn contract_address<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        manager: &AccountId,
    ) -> Result<AccountId, TransactionError> {
        self.workspace_record(state, manager)?
            .and_then(|r| r.current())
            .ok_or_else(|| FactoryError::WorkspaceNotFound.into())
    }

    pub fn address_is_new<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        manager: &AccountId,
    ) -> Result<bool, StateError> {
        Ok(self.workspace_record(state, manager)?.is_none())
    }

    pub fn amount_of_work_spaces<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<u64, StateError> {
        Ok(self.load(state)?.workspace_count)
    }

    pub fn current_workspace_library_version<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<u64, StateError> {
        Ok(self.load(state)?.workspace_version())
    }

    pub fn current_job_library_version<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<u64, StateError> {
        Ok(self.load(state)?.job_version())
    }

    pub fn contract_fee<S: StateAccess + ?Sized>(&self, state: &S) -> Result<u16, StateError> {
        Ok(self.load(state)?.contract_fee_bps)
    }

    pub fn is_disabled<S: StateAccess + ?Sized>(&self, state: &S) -> Result<bool, StateError> {
        Ok(self.load(state)?.disabled)
    }

    /// Where the protocol share of job payouts goes, and at what rate. With no pool
    /// configured the share is zero.
    pub fn protocol_share<S: StateAccess + ?Sized>(
        &self,
        state: &S,
    ) -> Result<Option<(AccountId, u16)>, StateError> {
        let fs = self.load(state)?;
        Ok(fs.dividends.map(|pool| (pool, fs.contract_fee_bps)))
    }
}

#[service_interface(id = "factory", abi_version = 1, state_schema = "v1")]
impl FactoryModule {
    /// Mints a workspace for the signer and initializes it.
    #[method]
    pub fn create_work_space(
        &self,
        state: &mut dyn StateAccess,
        params: CreateWorkSpaceParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let manager = ctx.signer_account_id;
        if manager.is_zero() {
            return Err(FactoryError::ZeroAddress.into());
        }
        if params.fee_bps > self.params.max_workspace_fee_bps {
            return Err(FactoryError::InvalidFee(params.fee_bps).into());
        }
        let mut fs = self.load(state)?;
        if fs.disabled {
            return Err(FactoryError::FactoryDisabled.into());
        }
        let (Some(workspace_library), Some(job_library)) = (fs.workspace_library, fs.job_library)
        else {
            return Err(FactoryError::TemplateNotSet.into());
        };

        let workspaces = sibling::<WorkspaceModule>(ctx, "workspace")?;
        let mut record = self
            .workspace_record(state, &manager)?
            .unwrap_or(WorkspaceRecord {
                manager,
                history: Vec::new(),
            });
        if let Some(live) = record.current() {
            let ws = workspaces.workspace(state, &live)?;
            let stale = ws.workspace_library.version < workspace_library.version
                || ws.job_library.version < job_library.version;
            if !stale {
                return Err(FactoryError::NoNewTemplate.into());
            }
        }

        let index = record.current_index() + 1;
        let address =
            derive_address(b"dwork::workspace", &[manager.as_ref(), &index.to_le_bytes()]);
        record.history.push(address);
        fs.workspace_count += 1;
        write_record(state, &Self::manager_key(&manager), &record)?;
        self.store(state, &fs)?;

        let init = InitializeWorkspaceParams {
            workspace: address,
            manager,
            metadata_url: params.metadata_url,
            fee_bps: params.fee_bps,
            workspace_library,
            job_library,
        };
        ctx.with_caller(self.params.address, |ctx| {
            workspaces.initialize(state, init, ctx)
        })?;

        tracing::info!(
            target: "factory",
            %manager,
            workspace = %address,
            index,
            "workspace created"
        );
        ctx.emit(MarketEvent::WorkSpaceCreated {
            manager,
            workspace: address,
            index,
        });
        Ok(())
    }

    /// Points new workspaces at a new template and bumps its version.
    #[method]
    pub fn set_work_space_library(
        &self,
        state: &mut dyn StateAccess,
        params: SetLibraryParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut fs = self.load(state)?;
        Self::ensure_owner_or_board(&fs, &ctx.signer_account_id)?;
        if params.address.is_zero() {
            return Err(FactoryError::ZeroAddress.into());
        }
        let library = LibraryRef {
            address: params.address,
            version: fs.workspace_version() + 1,
        };
        fs.workspace_library = Some(library);
        self.store(state, &fs)?;
        ctx.emit(MarketEvent::WorkSpaceLibraryVersion {
            library: library.address,
            version: library.version,
        });
        Ok(())
    }

    /// Points new jobs at a new template and bumps its version.
    #[method]
    pub fn set_job_library_address(
        &self,
        state: &mut dyn StateAccess,
        params: SetLibraryParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut fs = self.load(state)?;
        Self::ensure_owner_or_board(&fs, &ctx.signer_account_id)?;
        if params.address.is_zero() {
            return Err(FactoryError::ZeroAddress.into());
        }
        let library = LibraryRef {
            address: params.address,
            version: fs.job_version() + 1,
        };
        fs.job_library = Some(library);
        self.store(state, &fs)?;
        ctx.emit(MarketEvent::JobLibraryVersion {
            library: library.address,
            version: library.version,
        });
        Ok(())
    }

    /// Changes the protocol fee. Only the board may do this.
    #[method]
    pub fn set_contract_fee(
        &self,
        state: &mut dyn StateAccess,
        params: SetContractFeeParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        if params.bps > self.params.max_contract_fee_bps {
            return Err(FactoryError::FeeTooHigh(params.bps).into());
        }
        let mut fs = self.load(state)?;
        if fs.board != Some(ctx.signer_account_id) {
            return Err(FactoryError::NotBoard.into());
        }
        let old_bps = fs.contract_fee_bps;
        fs.contract_fee_bps = params.bps;
        self.store(state, &fs)?;
        tracing::info!(target: "factory", old_bps, new_bps = params.bps, "contract fee changed");
        ctx.emit(MarketEvent::ContractFeeChange {
            old_bps,
            new_bps: params.bps,
        });
        Ok(())
    }

    #[method]
    pub fn set_disabled(
        &self,
        state: &mut dyn StateAccess,
        params: SetDisabledParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut fs = self.load(state)?;
        Self::ensure_owner_or_board(&fs, &ctx.signer_account_id)?;
        fs.disabled = params.disabled;
        self.store(state, &fs)?;
        ctx.emit(MarketEvent::FactoryDisabled {
            disabled: params.disabled,
        });
        Ok(())
    }

    /// Sets the pool that receives the protocol share of job payouts.
    #[method]
    pub fn set_dividends_address(
        &self,
        state: &mut dyn StateAccess,
        params: SetAddressParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut fs = self.load(state)?;
        if ctx.signer_account_id != fs.owner {
            return Err(FactoryError::NotOwner.into());
        }
        if params.address.is_zero() {
            return Err(FactoryError::ZeroAddress.into());
        }
        fs.dividends = Some(params.address);
        self.store(state, &fs)?;
        Ok(())
    }

    #[method]
    pub fn set_board(
        &self,
        state: &mut dyn StateAccess,
        params: SetAddressParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut fs = self.load(state)?;
        if ctx.signer_account_id != fs.owner {
            return Err(FactoryError::NotOwner.into());
        }
        if params.address.is_zero() {
            return Err(FactoryError::ZeroAddress.into());
        }
        fs.board = Some(params.address);
        self.store(state, &fs)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use dwork_test_utils::fixtures::{manager, owner, stranger};
    use dwork_test_utils::{assert_code, assert_ok};

    fn create(h: &mut Harness, who: AccountId, fee_bps: u16) -> Result<(), TransactionError> {
        h.call(who, |s, st, ctx| {
            s.factory.create_work_space(
                st,
                CreateWorkSpaceParams {
                    fee_bps,
                    metadata_url: "ipfs://ws".into(),
                },
                ctx,
            )
        })
    }

    fn set_job_library(h: &mut Harness, who: AccountId, tag: u8) -> Result<(), TransactionError> {
        h.call(who, |s, st, ctx| {
            s.factory.set_job_library_address(
                st,
                SetLibraryParams {
                    address: AccountId([tag; 32]),
                },
                ctx,
            )
        })
    }

    #[test]
    fn create_requires_templates_and_bounded_fee() {
        let mut h = Harness::new();
        assert_code!(create(&mut h, manager(), 100), "502");
        h.install_templates(false);
        assert_code!(create(&mut h, manager(), 5001), "552");
        assert_ok!(create(&mut h, manager(), 5000));

        let ws = h
            .query(|s, st| s.factory.contract_address(st, &manager()))
            .unwrap();
        assert_eq!(
            h.query(|s, st| s.factory.historic_workspace(st, 1, &manager()))
                .unwrap(),
            ws
        );
        assert_eq!(h.query(|s, st| s.factory.amount_of_work_spaces(st)).unwrap(), 1);
        assert!(!h.query(|s, st| s.factory.address_is_new(st, &manager())).unwrap());
        assert!(h.query(|s, st| s.factory.address_is_new(st, &stranger())).unwrap());
        assert_eq!(
            h.query(|s, st| s.workspace.manager_address(st, &ws)).unwrap(),
            manager()
        );
        assert!(matches!(
            h.last_events().last(),
            Some(MarketEvent::WorkSpaceCreated { index: 1, .. })
        ));
        assert_code!(
            h.query(|s, st| s.factory.historic_workspace(st, 2, &manager())),
            "505"
        );
    }

    #[test]
    fn recreation_needs_a_newer_template() {
        let mut h = Harness::new();
        h.install_templates(false);
        assert_ok!(create(&mut h, manager(), 0));
        assert_code!(create(&mut h, manager(), 0), "503");

        assert_ok!(set_job_library(&mut h, owner(), 0x21));
        assert_ok!(create(&mut h, manager(), 0));
        assert_eq!(
            h.query(|s, st| s.factory.current_workspace_index(st, &manager()))
                .unwrap(),
            2
        );
        let first = h
            .query(|s, st| s.factory.historic_workspace(st, 1, &manager()))
            .unwrap();
        let live = h
            .query(|s, st| s.factory.contract_address(st, &manager()))
            .unwrap();
        assert_ne!(first, live);
    }

    #[test]
    fn disabled_factory_refuses_new_workspaces() {
        let mut h = Harness::new();
        h.install_templates(false);
        assert_code!(
            h.call(stranger(), |s, st, ctx| s.factory.set_disabled(
                st,
                SetDisabledParams { disabled: true },
                ctx
            )),
            "504"
        );
        assert_ok!(h.call(owner(), |s, st, ctx| s.factory.set_disabled(
            st,
            SetDisabledParams { disabled: true },
            ctx
        )));
        assert!(h.query(|s, st| s.factory.is_disabled(st)).unwrap());
        assert_code!(create(&mut h, manager(), 0), "501");
    }

    #[test]
    fn library_versions_count_up() {
        let mut h = Harness::new();
        assert_eq!(
            h.query(|s, st| s.factory.current_job_library_version(st)).unwrap(),
            0
        );
        assert_code!(set_job_library(&mut h, stranger(), 0x21), "504");
        assert_code!(set_job_library(&mut h, owner(), 0), "500");
        assert_ok!(set_job_library(&mut h, owner(), 0x21));
        assert_ok!(set_job_library(&mut h, owner(), 0x22));
        assert_eq!(
            h.query(|s, st| s.factory.current_job_library_version(st)).unwrap(),
            2
        );
        assert!(matches!(
            h.last_events().last(),
            Some(MarketEvent::JobLibraryVersion { version: 2, .. })
        ));
    }

    #[test]
    fn contract_fee_is_capped_then_board_only() {
        let mut h = Harness::new();
        let set_fee = |h: &mut Harness, who, bps| {
            h.call(who, |s, st, ctx| {
                s.factory
                    .set_contract_fee(st, SetContractFeeParams { bps }, ctx)
            })
        };
        assert_eq!(h.query(|s, st| s.factory.contract_fee(st)).unwrap(), 100);
        assert_code!(set_fee(&mut h, owner(), 1001), "521");
        assert_code!(set_fee(&mut h, owner(), 200), "557");

        let board = h.query(|s, _| s.board.address());
        assert_code!(
            h.call(stranger(), |s, st, ctx| s.factory.set_board(
                st,
                SetAddressParams { address: board },
                ctx
            )),
            "504"
        );
        assert_ok!(h.call(owner(), |s, st, ctx| s.factory.set_board(
            st,
            SetAddressParams { address: board },
            ctx
        )));
        assert_ok!(set_fee(&mut h, board, 1000));
        assert_eq!(h.query(|s, st| s.factory.contract_fee(st)).unwrap(), 1000);
        assert!(matches!(
            h.last_events().last(),
            Some(MarketEvent::ContractFeeChange {
                old_bps: 100,
                new_bps: 1000
            })
        ));
    }

    #[test]
    fn protocol_share_follows_the_dividends_address() {
        let mut h = Harness::new();
        assert_eq!(h.query(|s, st| s.factory.protocol_share(st)).unwrap(), None);
        h.install_templates(true);
        let pool = h.query(|s, _| s.dividends.address());
        assert_eq!(
            h.query(|s, st| s.factory.protocol_share(st)).unwrap(),
            Some((pool, 100))
        );
    }
}
