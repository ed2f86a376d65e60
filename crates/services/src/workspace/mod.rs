// Path: crates/services/src/workspace/mod.rs
//! Workspaces: participant registration, moderation, written contracts, and job creation.
//!
//! Every workspace minted by the factory lives in this one service, keyed by its derived
//! address. Calls name the workspace they target in their parameters.

use crate::factory::FactoryModule;
use crate::job::{AssignWorkerParams, InitializeJobParams, JobModule};
use crate::sibling;
use dwork_api::state::{read_record, write_record, StateAccess};
use dwork_api::transaction::context::TxContext;
use dwork_macros::service_interface;
use dwork_types::app::{
    content_hash, derive_address, AccountId, CallerRole, LibraryRef, MarketEvent, Participant,
    Role, WorkspaceState, WrittenContract,
};
use dwork_types::error::{FactoryError, StateError, TransactionError, WorkspaceError};
use dwork_types::keys::{
    WORKSPACE_CLIENT_JOBS_PREFIX, WORKSPACE_CONTRACT_PREFIX, WORKSPACE_INVITE_PREFIX,
    WORKSPACE_MEMBER_PREFIX, WORKSPACE_STATE_PREFIX,
};
use dwork_types::service_configs::FactoryParams;
use parity_scale_codec::{Decode, Encode};

// --- Service Method Parameter Structs ---

/// Sent by the factory right after it mints a workspace.
#[derive(Encode, Decode, Debug, Clone)]
pub struct InitializeWorkspaceParams {
    pub workspace: AccountId,
    pub manager: AccountId,
    pub metadata_url: String,
    pub fee_bps: u16,
    pub workspace_library: LibraryRef,
    pub job_library: LibraryRef,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct RegisterParams {
    pub workspace: AccountId,
    pub metadata_url: String,
    pub who: AccountId,
    pub invite_code: String,
    pub contract_hash: [u8; 32],
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct ModerateParams {
    pub workspace: AccountId,
    pub target: AccountId,
    pub role: Role,
    pub disable: bool,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct CreateJobParams {
    pub workspace: AccountId,
    pub metadata_url: String,
    pub on_behalf_of: Option<AccountId>,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct AddWorkerParams {
    pub workspace: AccountId,
    pub job: AccountId,
    pub worker: AccountId,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetFlagParams {
    pub workspace: AccountId,
    pub value: bool,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct InviteParams {
    pub workspace: AccountId,
    pub code: String,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct WorkspaceRef {
    pub workspace: AccountId,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetFeeParams {
    pub workspace: AccountId,
    pub fee_bps: u16,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetMetadataParams {
    pub workspace: AccountId,
    pub metadata_url: String,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct AddContractParams {
    pub workspace: AccountId,
    pub hash: [u8; 32],
    pub url: String,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct ContractHashParams {
    pub workspace: AccountId,
    pub hash: [u8; 32],
}

// --- Workspace Module ---

#[derive(Default, Debug)]
pub struct WorkspaceModule {
    factory: AccountId,
    max_fee_bps: u16,
}

impl WorkspaceModule {
    /// Workspaces trust the factory configured in `params` and share its fee cap.
    pub fn new(params: &FactoryParams) -> Self {
        Self {
            factory: params.address,
            max_fee_bps: params.max_workspace_fee_bps,
        }
    }

    fn state_key(workspace: &AccountId) -> Vec<u8> {
        [WORKSPACE_STATE_PREFIX, workspace.as_ref()].concat()
    }

    fn member_key(workspace: &AccountId, who: &AccountId) -> Vec<u8> {
        [WORKSPACE_MEMBER_PREFIX, workspace.as_ref(), who.as_ref()].concat()
    }

    fn invite_key(workspace: &AccountId, code: &str) -> Vec<u8> {
        [
            WORKSPACE_INVITE_PREFIX,
            workspace.as_ref(),
            &content_hash(code.as_bytes()),
        ]
        .concat()
    }

    fn contract_key(workspace: &AccountId, hash: &[u8; 32]) -> Vec<u8> {
        [WORKSPACE_CONTRACT_PREFIX, workspace.as_ref(), hash].concat()
    }

    fn client_jobs_key(workspace: &AccountId, client: &AccountId) -> Vec<u8> {
        [WORKSPACE_CLIENT_JOBS_PREFIX, workspace.as_ref(), client.as_ref()].concat()
    }

    fn store(&self, state: &mut dyn StateAccess, ws: &WorkspaceState) -> Result<(), StateError> {
        write_record(state, &Self::state_key(&ws.address), ws)
    }

    /// Loads the workspace and checks the signer is its manager.
    fn managed(
        &self,
        state: &dyn StateAccess,
        workspace: &AccountId,
        ctx: &TxContext,
    ) -> Result<WorkspaceState, TransactionError> {
        let ws = self.workspace(state, workspace)?;
        if ws.manager != ctx.signer_account_id {
            return Err(WorkspaceError::NotManager.into());
        }
        Ok(ws)
    }

    // --- Queries ---

    pub fn workspace<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
    ) -> Result<WorkspaceState, TransactionError> {
        read_record(state, &Self::state_key(workspace))?
            .ok_or_else(|| WorkspaceError::UnknownWorkspace.into())
    }

    pub fn participant<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
        who: &AccountId,
    ) -> Result<Option<Participant>, StateError> {
        read_record(state, &Self::member_key(workspace, who))
    }

    /// A participant registered under exactly `role`.
    fn member_as<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
        who: &AccountId,
        role: Role,
    ) -> Result<Option<Participant>, StateError> {
        Ok(self
            .participant(state, workspace, who)?
            .filter(|p| p.initialized && p.role == role))
    }

    pub fn who_am_i<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
        who: &AccountId,
    ) -> Result<CallerRole, TransactionError> {
        let ws = self.workspace(state, workspace)?;
        if ws.manager == *who {
            return Ok(CallerRole::Manager);
        }
        Ok(match self.participant(state, workspace, who)? {
            Some(p) if p.initialized && p.role == Role::Client => CallerRole::Client,
            Some(p) if p.initialized && p.role == Role::Worker => CallerRole::Worker,
            _ => CallerRole::Unknown,
        })
    }

    /// Registered `(workers, clients)`, each in address order.
    pub fn addresses<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
    ) -> Result<(Vec<AccountId>, Vec<AccountId>), StateError> {
        let prefix = [WORKSPACE_MEMBER_PREFIX, workspace.as_ref()].concat();
        let mut workers = Vec::new();
        let mut clients = Vec::new();
        for item in state.prefix_scan(&prefix)? {
            let (key, value) = item?;
            let who: [u8; 32] = key
                .get(prefix.len()..)
                .and_then(|tail| tail.try_into().ok())
                .ok_or_else(|| StateError::InvalidValue("malformed member key".into()))?;
            let p: Participant = dwork_types::codec::from_bytes_canonical(&value)
                .map_err(StateError::Decode)?;
            match p.role {
                Role::Worker => workers.push(AccountId(who)),
                Role::Client => clients.push(AccountId(who)),
            }
        }
        Ok((workers, clients))
    }

    pub fn client_jobs<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
        client: &AccountId,
    ) -> Result<Vec<AccountId>, StateError> {
        Ok(read_record(state, &Self::client_jobs_key(workspace, client))?.unwrap_or_default())
    }

    pub fn manager_address<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
    ) -> Result<AccountId, TransactionError> {
        Ok(self.workspace(state, workspace)?.manager)
    }

    /// The factory's live job template version. A job whose stamp differs is deprecated.
    pub fn current_job_library_version<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        factory: &FactoryModule,
    ) -> Result<u64, StateError> {
        factory.current_job_library_version(state)
    }

    pub fn written_contract<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
        hash: &[u8; 32],
    ) -> Result<Option<WrittenContract>, StateError> {
        read_record(state, &Self::contract_key(workspace, hash))
    }

    pub fn invite_is_valid<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        workspace: &AccountId,
        code: &str,
    ) -> Result<bool, StateError> {
        Ok(state.get(&Self::invite_key(workspace, code))?.is_some())
    }

    // --- Registration ---

    fn register(
        &self,
        state: &mut dyn StateAccess,
        params: RegisterParams,
        role: Role,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let caller = ctx.signer_account_id;
        let ws = self.workspace(state, &params.workspace)?;
        let who = params.who;

        if who.is_zero() {
            return Err(WorkspaceError::ZeroAddress.into());
        }
        if caller != ws.manager && caller != who {
            return Err(WorkspaceError::ThirdPartyRegistration(role).into());
        }
        if who == ws.manager {
            return Err(WorkspaceError::ManagerCannotRegister(role).into());
        }
        if !ws.registration_open {
            return Err(WorkspaceError::RegistrationClosed(role).into());
        }
        if let Some(existing) = self.participant(state, &params.workspace, &who)? {
            if existing.initialized && existing.role != role {
                return Err(WorkspaceError::AlreadyOtherRole(role).into());
            }
            if existing.initialized {
                return Err(WorkspaceError::AlreadyRegistered(role).into());
            }
        }
        if ws.require_invite {
            let key = Self::invite_key(&params.workspace, &params.invite_code);
            if params.invite_code.is_empty() || state.get(&key)?.is_none() {
                return Err(WorkspaceError::InviteRequired.into());
            }
            state.delete(&key)?;
        }

        let participant = Participant {
            role,
            metadata_url: params.metadata_url,
            initialized: true,
            disabled: false,
            contract_hash: params.contract_hash,
            registered_at: ctx.block_height,
        };
        write_record(state, &Self::member_key(&params.workspace, &who), &participant)?;
        tracing::info!(
            target: "workspace",
            workspace = %params.workspace,
            %who,
            %role,
            "registered"
        );
        ctx.emit(MarketEvent::RegistrationSuccess {
            workspace: params.workspace,
            who,
            role,
        });
        Ok(())
    }
}

#[service_interface(id = "workspace", abi_version = 1, state_schema = "v1")]
impl WorkspaceModule {
    /// One-time setup, accepted only from the factory.
    #[method]
    pub fn initialize(
        &self,
        state: &mut dyn StateAccess,
        params: InitializeWorkspaceParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        if ctx.signer_account_id != self.factory {
            return Err(WorkspaceError::NotFactory.into());
        }
        if state.get(&Self::state_key(&params.workspace))?.is_some() {
            return Err(WorkspaceError::AlreadyInitialized.into());
        }
        if params.manager.is_zero() {
            return Err(WorkspaceError::ZeroAddress.into());
        }
        let ws = WorkspaceState {
            address: params.workspace,
            manager: params.manager,
            factory: self.factory,
            metadata_url: params.metadata_url,
            fee_bps: params.fee_bps,
            registration_open: false,
            require_invite: true,
            workspace_library: params.workspace_library,
            job_library: params.job_library,
            current_client_contract: None,
            current_worker_contract: None,
            job_count: 0,
            created_at: ctx.block_height,
        };
        self.store(state, &ws)
            .map_err(TransactionError::from)
    }

    #[method]
    pub fn register_client(
        &self,
        state: &mut dyn StateAccess,
        params: RegisterParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        self.register(state, params, Role::Client, ctx)
    }

    #[method]
    pub fn register_worker(
        &self,
        state: &mut dyn StateAccess,
        params: RegisterParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        self.register(state, params, Role::Worker, ctx)
    }

    /// Disables or re-enables a registered participant.
    #[method]
    pub fn moderate_target(
        &self,
        state: &mut dyn StateAccess,
        params: ModerateParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        self.managed(state, &params.workspace, ctx)?;
        let mut p = self
            .member_as(state, &params.workspace, &params.target, params.role)?
            .ok_or(WorkspaceError::NotRegistered(params.role))?;
        p.disabled = params.disable;
        write_record(
            state,
            &Self::member_key(&params.workspace, &params.target),
            &p,
        )?;
        ctx.emit(MarketEvent::Moderated {
            workspace: params.workspace,
            target: params.target,
            role: params.role,
            disabled: params.disable,
        });
        Ok(())
    }

    /// Mints a job for a registered, enabled client.
    #[method]
    pub fn create_job(
        &self,
        state: &mut dyn StateAccess,
        params: CreateJobParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let caller = ctx.signer_account_id;
        let mut ws = self.workspace(state, &params.workspace)?;

        let client = if caller == ws.manager {
            let target = params.on_behalf_of.ok_or(WorkspaceError::UnknownClient)?;
            let p = self
                .member_as(state, &params.workspace, &target, Role::Client)?
                .ok_or(WorkspaceError::UnknownClient)?;
            if p.disabled {
                return Err(WorkspaceError::ClientDisabled.into());
            }
            target
        } else {
            let p = self
                .member_as(state, &params.workspace, &caller, Role::Client)?
                .ok_or(WorkspaceError::Unauthorized)?;
            if params.on_behalf_of.is_some_and(|target| target != caller) {
                return Err(WorkspaceError::OnBehalfForbidden.into());
            }
            if p.disabled {
                return Err(WorkspaceError::ClientDisabled.into());
            }
            caller
        };

        let factory = sibling::<FactoryModule>(ctx, "factory")?;
        let library = factory
            .load(state)?
            .job_library
            .ok_or(FactoryError::TemplateNotSet)?;
        let jobs = sibling::<JobModule>(ctx, "job")?;

        ws.job_count += 1;
        let job = derive_address(
            b"dwork::job",
            &[ws.address.as_ref(), client.as_ref(), &ws.job_count.to_le_bytes()],
        );
        self.store(state, &ws)?;
        let mut list = self.client_jobs(state, &ws.address, &client)?;
        list.push(job);
        write_record(state, &Self::client_jobs_key(&ws.address, &client), &list)?;

        let init = InitializeJobParams {
            job,
            workspace: ws.address,
            client,
            manager: ws.manager,
            metadata_url: params.metadata_url,
            library,
        };
        ctx.with_caller(ws.address, |ctx| jobs.initialize(state, init, ctx))?;

        tracing::info!(target: "workspace", workspace = %ws.address, %job, %client, "job created");
        ctx.emit(MarketEvent::JobCreated {
            workspace: ws.address,
            job,
            client,
        });
        Ok(())
    }

    /// Assigns a registered, enabled worker to one of this workspace's jobs.
    #[method]
    pub fn add_worker(
        &self,
        state: &mut dyn StateAccess,
        params: AddWorkerParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let caller = ctx.signer_account_id;
        let ws = self.workspace(state, &params.workspace)?;
        let jobs = sibling::<JobModule>(ctx, "job")?;
        let record = jobs.job(state, &params.job)?;

        if record.workspace != ws.address {
            return Err(WorkspaceError::ForeignJob.into());
        }
        if caller != record.client && caller != ws.manager {
            return Err(WorkspaceError::NotJobParticipant.into());
        }
        let worker = self
            .member_as(state, &ws.address, &params.worker, Role::Worker)?
            .ok_or(WorkspaceError::NotRegistered(Role::Worker))?;
        if worker.disabled {
            return Err(WorkspaceError::WorkerDisabled.into());
        }

        let assign = AssignWorkerParams {
            job: params.job,
            worker: params.worker,
        };
        ctx.with_caller(ws.address, |ctx| jobs.assign_worker(state, assign, ctx))
    }

    #[method]
    pub fn set_registration_open(
        &self,
        state: &mut dyn StateAccess,
        params: SetFlagParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        ws.registration_open = params.value;
        Ok(self.store(state, &ws)?)
    }

    #[method]
    pub fn set_require_invite(
        &self,
        state: &mut dyn StateAccess,
        params: SetFlagParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        ws.require_invite = params.value;
        Ok(self.store(state, &ws)?)
    }

    /// Turns invite gating off.
    #[method]
    pub fn no_invites(
        &self,
        state: &mut dyn StateAccess,
        params: WorkspaceRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        ws.require_invite = false;
        Ok(self.store(state, &ws)?)
    }

    /// Adds a one-time invite code. Only its hash is stored.
    #[method]
    pub fn add_invite_token(
        &self,
        state: &mut dyn StateAccess,
        params: InviteParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        self.managed(state, &params.workspace, ctx)?;
        if params.code.is_empty() {
            return Err(WorkspaceError::InviteRequired.into());
        }
        state.insert(&Self::invite_key(&params.workspace, &params.code), &[1])?;
        Ok(())
    }

    #[method]
    pub fn set_fee(
        &self,
        state: &mut dyn StateAccess,
        params: SetFeeParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        if params.fee_bps > self.max_fee_bps {
            return Err(WorkspaceError::InvalidFee(params.fee_bps).into());
        }
        ws.fee_bps = params.fee_bps;
        Ok(self.store(state, &ws)?)
    }

    #[method]
    pub fn set_metadata(
        &self,
        state: &mut dyn StateAccess,
        params: SetMetadataParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        ws.metadata_url = params.metadata_url;
        Ok(self.store(state, &ws)?)
    }

    /// Files a written contract. Filed contracts are never removed.
    #[method]
    pub fn add_written_contract(
        &self,
        state: &mut dyn StateAccess,
        params: AddContractParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        self.managed(state, &params.workspace, ctx)?;
        let key = Self::contract_key(&params.workspace, &params.hash);
        if state.get(&key)?.is_some() {
            return Err(WorkspaceError::ContractExists.into());
        }
        let contract = WrittenContract {
            hash: params.hash,
            url: params.url,
            added_at: ctx.block_height,
        };
        write_record(state, &key, &contract)?;
        ctx.emit(MarketEvent::WrittenContractAdded {
            workspace: params.workspace,
            hash: params.hash,
        });
        Ok(())
    }

    #[method]
    pub fn set_current_client_contract_hash(
        &self,
        state: &mut dyn StateAccess,
        params: ContractHashParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        if self
            .written_contract(state, &params.workspace, &params.hash)?
            .is_none()
        {
            return Err(WorkspaceError::ContractNotFound.into());
        }
        ws.current_client_contract = Some(params.hash);
        Ok(self.store(state, &ws)?)
    }

    #[method]
    pub fn set_current_worker_contract_hash(
        &self,
        state: &mut dyn StateAccess,
        params: ContractHashParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut ws = self.managed(state, &params.workspace, ctx)?;
        if self
            .written_contract(state, &params.workspace, &params.hash)?
            .is_none()
        {
            return Err(WorkspaceError::ContractNotFound.into());
        }
        ws.current_worker_contract = Some(params.hash);
        Ok(self.store(state, &ws)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Harness;
    use dwork_test_utils::fixtures::{client, manager, stranger, worker};
    use dwork_test_utils::{assert_code, assert_ok};

    fn workspace() -> (Harness, AccountId) {
        let mut h = Harness::new();
        h.install_templates(false);
        let ws = h.open_workspace(manager(), 1000);
        (h, ws)
    }

    fn register(
        h: &mut Harness,
        ws: AccountId,
        signer: AccountId,
        who: AccountId,
        role: Role,
        invite_code: &str,
    ) -> Result<(), TransactionError> {
        let mut params = Harness::self_registration(ws, who);
        params.invite_code = invite_code.to_string();
        h.call(signer, |s, st, ctx| match role {
            Role::Client => s.workspace.register_client(st, params, ctx),
            Role::Worker => s.workspace.register_worker(st, params, ctx),
        })
    }

    type SetFlag = fn(
        &WorkspaceModule,
        &mut dyn StateAccess,
        SetFlagParams,
        &mut TxContext,
    ) -> Result<(), TransactionError>;

    fn set_flag(h: &mut Harness, ws: AccountId, f: SetFlag, value: bool) {
        assert_ok!(h.call(manager(), |s, st, ctx| f(
            s.workspace,
            st,
            SetFlagParams {
                workspace: ws,
                value
            },
            ctx
        )));
    }

    #[test]
    fn registration_error_codes_follow_role_and_order() {
        let (mut h, ws) = workspace();
        let zero = AccountId::ZERO;
        assert_code!(register(&mut h, ws, client(), zero, Role::Client, ""), "500");
        assert_code!(register(&mut h, ws, stranger(), client(), Role::Client, ""), "550");
        assert_code!(register(&mut h, ws, stranger(), worker(), Role::Worker, ""), "549");
        assert_code!(register(&mut h, ws, manager(), manager(), Role::Client, ""), "516");
        assert_code!(register(&mut h, ws, manager(), manager(), Role::Worker, ""), "512");

        assert_ok!(register(&mut h, ws, client(), client(), Role::Client, ""));
        assert_code!(register(&mut h, ws, client(), client(), Role::Client, ""), "554");
        assert_code!(register(&mut h, ws, client(), client(), Role::Worker, ""), "514");
        assert_ok!(register(&mut h, ws, manager(), worker(), Role::Worker, ""));
        assert_code!(register(&mut h, ws, worker(), worker(), Role::Worker, ""), "553");
        assert_code!(register(&mut h, ws, worker(), worker(), Role::Client, ""), "515");

        set_flag(&mut h, ws, WorkspaceModule::set_registration_open, false);
        assert_code!(register(&mut h, ws, stranger(), stranger(), Role::Client, ""), "517");
        assert_code!(register(&mut h, ws, stranger(), stranger(), Role::Worker, ""), "513");
    }

    #[test]
    fn invites_are_required_by_default_and_single_use() {
        let (mut h, ws) = workspace();
        set_flag(&mut h, ws, WorkspaceModule::set_require_invite, true);
        assert_code!(register(&mut h, ws, client(), client(), Role::Client, ""), "587");

        assert_code!(
            h.call(client(), |s, st, ctx| s.workspace.add_invite_token(
                st,
                InviteParams {
                    workspace: ws,
                    code: "welcome".into()
                },
                ctx
            )),
            "510"
        );
        assert_ok!(h.call(manager(), |s, st, ctx| s.workspace.add_invite_token(
            st,
            InviteParams {
                workspace: ws,
                code: "welcome".into()
            },
            ctx
        )));
        assert!(h
            .query(|s, st| s.workspace.invite_is_valid(st, &ws, "welcome"))
            .unwrap());
        assert_code!(register(&mut h, ws, client(), client(), Role::Client, "wrong"), "587");
        assert_ok!(register(&mut h, ws, client(), client(), Role::Client, "welcome"));
        assert_code!(register(&mut h, ws, worker(), worker(), Role::Worker, "welcome"), "587");

        assert_ok!(h.call(manager(), |s, st, ctx| s
            .workspace
            .no_invites(st, WorkspaceRef { workspace: ws }, ctx)));
        assert_ok!(register(&mut h, ws, worker(), worker(), Role::Worker, ""));
    }

    #[test]
    fn moderation_round_trip_restores_the_participant() {
        let (mut h, ws) = workspace();
        h.register_client(ws, client());
        let before = h
            .query(|s, st| s.workspace.participant(st, &ws, &client()))
            .unwrap()
            .unwrap();

        let moderate = |h: &mut Harness, signer, disable| {
            h.call(signer, |s, st, ctx| {
                s.workspace.moderate_target(
                    st,
                    ModerateParams {
                        workspace: ws,
                        target: client(),
                        role: Role::Client,
                        disable,
                    },
                    ctx,
                )
            })
        };
        assert_code!(moderate(&mut h, client(), true), "510");
        assert_ok!(moderate(&mut h, manager(), true));
        let disabled = h
            .query(|s, st| s.workspace.participant(st, &ws, &client()))
            .unwrap()
            .unwrap();
        assert!(disabled.disabled && disabled.initialized);
        assert_code!(
            h.call(client(), |s, st, ctx| s.workspace.create_job(
                st,
                CreateJobParams {
                    workspace: ws,
                    metadata_url: String::new(),
                    on_behalf_of: None
                },
                ctx
            )),
            "508"
        );

        assert_ok!(moderate(&mut h, manager(), false));
        let after = h
            .query(|s, st| s.workspace.participant(st, &ws, &client()))
            .unwrap()
            .unwrap();
        assert_eq!(before, after);

        assert_code!(
            h.call(manager(), |s, st, ctx| s.workspace.moderate_target(
                st,
                ModerateParams {
                    workspace: ws,
                    target: client(),
                    role: Role::Worker,
                    disable: true,
                },
                ctx
            )),
            "555"
        );
    }

    #[test]
    fn create_job_authorization() {
        let (mut h, ws) = workspace();
        h.register_client(ws, client());
        let create = |h: &mut Harness, signer, on_behalf_of| {
            h.call(signer, |s, st, ctx| {
                s.workspace.create_job(
                    st,
                    CreateJobParams {
                        workspace: ws,
                        metadata_url: "ipfs://job".into(),
                        on_behalf_of,
                    },
                    ctx,
                )
            })
        };
        assert_code!(create(&mut h, stranger(), None), "509");
        assert_code!(create(&mut h, client(), Some(stranger())), "558");
        assert_code!(create(&mut h, manager(), None), "507");
        assert_code!(create(&mut h, manager(), Some(stranger())), "507");
        assert_ok!(create(&mut h, manager(), Some(client())));
        assert_ok!(create(&mut h, client(), None));

        let jobs = h
            .query(|s, st| s.workspace.client_jobs(st, &ws, &client()))
            .unwrap();
        assert_eq!(jobs.len(), 2);
        assert_ne!(jobs[0], jobs[1]);
        let record = h.query(|s, st| s.job.job(st, &jobs[1])).unwrap();
        assert_eq!(record.client, client());
        assert_eq!(record.manager, manager());
        assert_eq!(record.workspace, ws);
    }

    #[test]
    fn add_worker_checks_job_and_worker() {
        let (mut h, ws) = workspace();
        h.register_client(ws, client());
        h.register_worker(ws, worker());
        let job = h.create_job(ws, client());
        let add = |h: &mut Harness, signer, worker| {
            h.call(signer, |s, st, ctx| {
                s.workspace.add_worker(
                    st,
                    AddWorkerParams {
                        workspace: ws,
                        job,
                        worker,
                    },
                    ctx,
                )
            })
        };
        assert_code!(add(&mut h, stranger(), worker()), "561");
        assert_code!(add(&mut h, client(), stranger()), "555");
        assert_ok!(add(&mut h, manager(), worker()));
        assert_eq!(
            h.query(|s, st| s.job.worker(st, &job)).unwrap(),
            Some(worker())
        );

        let other = h.open_workspace(stranger(), 0);
        assert_code!(
            h.call(manager(), |s, st, ctx| s.workspace.add_worker(
                st,
                AddWorkerParams {
                    workspace: other,
                    job,
                    worker: worker(),
                },
                ctx
            )),
            "562"
        );
    }

    #[test]
    fn manager_settings_and_written_contracts() {
        let (mut h, ws) = workspace();
        let hash = content_hash(b"terms v1");
        assert_code!(
            h.call(manager(), |s, st, ctx| s.workspace.set_fee(
                st,
                SetFeeParams {
                    workspace: ws,
                    fee_bps: 5001
                },
                ctx
            )),
            "552"
        );
        let params = ContractHashParams { workspace: ws, hash };
        assert_code!(
            h.call(manager(), |s, st, ctx| s
                .workspace
                .set_current_client_contract_hash(st, params.clone(), ctx)),
            "563"
        );
        let add = |h: &mut Harness| {
            h.call(manager(), |s, st, ctx| {
                s.workspace.add_written_contract(
                    st,
                    AddContractParams {
                        workspace: ws,
                        hash,
                        url: "ipfs://terms".into(),
                    },
                    ctx,
                )
            })
        };
        assert_ok!(add(&mut h));
        assert_code!(add(&mut h), "564");
        assert_ok!(h.call(manager(), |s, st, ctx| s
            .workspace
            .set_current_worker_contract_hash(st, params, ctx)));
        let state = h.query(|s, st| s.workspace.workspace(st, &ws)).unwrap();
        assert_eq!(state.current_worker_contract, Some(hash));
        assert_eq!(state.fee_bps, 1000);
    }

    #[test]
    fn who_am_i_and_addresses() {
        let (mut h, ws) = workspace();
        h.register_client(ws, client());
        h.register_worker(ws, worker());
        let role = |h: &Harness, who: AccountId| {
            h.query(|s, st| s.workspace.who_am_i(st, &ws, &who))
                .unwrap()
                .code()
        };
        assert_eq!(role(&h, manager()), 201);
        assert_eq!(role(&h, client()), 202);
        assert_eq!(role(&h, worker()), 203);
        assert_eq!(role(&h, stranger()), 200);

        let (workers, clients) = h.query(|s, st| s.workspace.addresses(st, &ws)).unwrap();
        assert_eq!(workers, vec![worker()]);
        assert_eq!(clients, vec![client()]);
    }

    #[test]
    fn initialize_is_factory_only() {
        let (mut h, ws) = workspace();
        let record = h.query(|s, st| s.workspace.workspace(st, &ws)).unwrap();
        let init = |workspace| InitializeWorkspaceParams {
            workspace,
            manager: manager(),
            metadata_url: String::new(),
            fee_bps: 0,
            workspace_library: record.workspace_library,
            job_library: record.job_library,
        };
        let factory = h.query(|s, _| s.factory.address());
        assert_code!(
            h.call(manager(), |s, st, ctx| s
                .workspace
                .initialize(st, init(AccountId([0x55; 32])), ctx)),
            "520"
        );
        assert_code!(
            h.call(factory, |s, st, ctx| s.workspace.initialize(st, init(ws), ctx)),
            "511"
        );
    }

    #[test]
    fn job_template_swaps_deprecate_earlier_jobs_only() {
        let (mut h, ws) = workspace();
        h.register_client(ws, client());
        let old_job = h.create_job(ws, client());
        let version = |h: &Harness| {
            h.query(|s, st| s.workspace.current_job_library_version(st, s.factory))
                .unwrap()
        };
        assert_eq!(version(&h), 1);

        assert_ok!(h.call(dwork_test_utils::fixtures::owner(), |s, st, ctx| s
            .factory
            .set_job_library_address(
                st,
                crate::factory::SetLibraryParams {
                    address: AccountId([0x13; 32]),
                },
                ctx
            )));
        assert_eq!(version(&h), 2);
        let new_job = h.create_job(ws, client());

        let deprecated = |h: &Harness, job| {
            h.query(|s, st| s.job.is_deprecated(st, &job, s.factory))
                .unwrap()
        };
        assert!(deprecated(&h, old_job));
        assert!(!deprecated(&h, new_job));
    }
}
