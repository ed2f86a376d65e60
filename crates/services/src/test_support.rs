// Path: crates/services/src/test_support.rs
//! An in-process harness for service unit tests.
//!
//! Each `call` runs against a fresh overlay on the store and commits only on success,
//! the same way the execution machine treats a submitted call.

use crate::bank::{self, BankModule};
use crate::board::BoardModule;
use crate::dividends::DividendsModule;
use crate::factory::{CreateWorkSpaceParams, FactoryModule, SetAddressParams, SetLibraryParams};
use crate::job::JobModule;
use crate::link::LinkModule;
use crate::workspace::{CreateJobParams, RegisterParams, SetFlagParams, WorkspaceModule};
use dwork_api::ledger::TokenLedger;
use dwork_api::services::access::ServiceDirectory;
use dwork_api::services::BlockchainService;
use dwork_api::state::{StateAccess, StateOverlay};
use dwork_api::transaction::context::TxContext;
use dwork_state::MemoryStore;
use dwork_test_utils::fixtures::owner;
use dwork_test_utils::LedgerToken;
use dwork_types::app::{AccountId, MarketEvent};
use dwork_types::error::TransactionError;
use dwork_types::service_configs::{BoardParams, DividendsParams, FactoryParams, JobParams};
use std::sync::Arc;

/// Typed handles to every registered service.
pub(crate) struct Services<'a> {
    pub bank: &'a BankModule,
    pub factory: &'a FactoryModule,
    pub workspace: &'a WorkspaceModule,
    pub job: &'a JobModule,
    pub dividends: &'a DividendsModule,
    pub board: &'a BoardModule,
    pub link: &'a LinkModule,
}

impl<'a> Services<'a> {
    fn resolve(directory: &'a ServiceDirectory) -> Self {
        Self {
            bank: directory.get().expect("bank"),
            factory: directory.get().expect("factory"),
            workspace: directory.get().expect("workspace"),
            job: directory.get().expect("job"),
            dividends: directory.get().expect("dividends"),
            board: directory.get().expect("board"),
            link: directory.get().expect("link"),
        }
    }
}

pub(crate) struct Harness {
    pub store: MemoryStore,
    pub directory: ServiceDirectory,
    pub height: u64,
    pub token: LedgerToken,
    events: Vec<MarketEvent>,
}

impl Harness {
    /// All services with default parameters. `owner()` owns the factory and the pool and
    /// is the first board maintainer.
    pub fn new() -> Self {
        let token: Arc<dyn TokenLedger> = Arc::new(LedgerToken::new());
        let factory_params = FactoryParams {
            owner: owner(),
            ..Default::default()
        };
        let services: Vec<Arc<dyn BlockchainService>> = vec![
            Arc::new(BankModule::new()),
            Arc::new(WorkspaceModule::new(&factory_params)),
            Arc::new(FactoryModule::new(factory_params)),
            Arc::new(JobModule::new(JobParams::default())),
            Arc::new(DividendsModule::new(
                DividendsParams {
                    owner: owner(),
                    ..Default::default()
                },
                token.clone(),
            )),
            Arc::new(BoardModule::new(
                BoardParams {
                    initial_maintainer: owner(),
                    ..Default::default()
                },
                token,
            )),
            Arc::new(LinkModule::new()),
        ];
        let directory = ServiceDirectory::new(services);
        let mut store = MemoryStore::new();
        {
            let s = Services::resolve(&directory);
            s.factory.genesis(&mut store).expect("factory genesis");
            s.board.genesis(&mut store).expect("board genesis");
        }
        Self {
            store,
            directory,
            height: 1,
            token: LedgerToken::new(),
            events: Vec::new(),
        }
    }

    /// Runs one call as `signer`. State and events are kept only if it succeeds.
    pub fn call<R, F>(&mut self, signer: AccountId, f: F) -> Result<R, TransactionError>
    where
        F: FnOnce(
            &Services<'_>,
            &mut dyn StateAccess,
            &mut TxContext<'_>,
        ) -> Result<R, TransactionError>,
    {
        let directory = self.directory.clone();
        let services = Services::resolve(&directory);
        let mut overlay = StateOverlay::new(&self.store);
        let mut ctx = TxContext::new(self.height, signer, &directory);
        let result = f(&services, &mut overlay, &mut ctx);
        if result.is_ok() {
            let (inserts, deletes) = overlay.into_ordered_batch();
            self.store
                .batch_apply(&inserts, &deletes)
                .expect("commit overlay");
            self.events = ctx.events;
        }
        result
    }

    pub fn query<R>(&self, f: impl FnOnce(&Services<'_>, &dyn StateAccess) -> R) -> R {
        let services = Services::resolve(&self.directory);
        f(&services, &self.store)
    }

    /// Events from the last successful call.
    pub fn last_events(&self) -> &[MarketEvent] {
        &self.events
    }

    pub fn advance(&mut self, blocks: u64) {
        self.height += blocks;
    }

    pub fn fund(&mut self, who: &AccountId, amount: u128) {
        bank::mint(&mut self.store, who, amount).expect("mint native");
    }

    pub fn native(&self, who: &AccountId) -> u128 {
        bank::balance_of(&self.store, who).expect("native balance")
    }

    pub fn mint_tokens(&mut self, who: &AccountId, amount: u128) {
        self.token
            .mint(&mut self.store, who, amount)
            .expect("mint tokens");
    }

    pub fn tokens(&self, who: &AccountId) -> u128 {
        self.token
            .balance_of(&self.store, who)
            .expect("token balance")
    }

    pub fn approve(&mut self, holder: &AccountId, spender: &AccountId, amount: u128) {
        self.token
            .approve(&mut self.store, holder, spender, amount)
            .expect("approve");
    }

    // --- Marketplace setup shortcuts ---

    /// Registers both templates and, optionally, the dividends pool.
    pub fn install_templates(&mut self, with_pool: bool) {
        let pool = self.query(|s, _| s.dividends.address());
        self.call(owner(), |s, st, ctx| {
            s.factory.set_work_space_library(
                st,
                SetLibraryParams {
                    address: AccountId([0x11; 32]),
                },
                ctx,
            )?;
            s.factory.set_job_library_address(
                st,
                SetLibraryParams {
                    address: AccountId([0x12; 32]),
                },
                ctx,
            )?;
            if with_pool {
                s.factory
                    .set_dividends_address(st, SetAddressParams { address: pool }, ctx)?;
            }
            Ok(())
        })
        .expect("install templates");
    }

    /// Creates a workspace with open, invite-free registration.
    pub fn open_workspace(&mut self, manager: AccountId, fee_bps: u16) -> AccountId {
        self.call(manager, |s, st, ctx| {
            s.factory.create_work_space(
                st,
                CreateWorkSpaceParams {
                    fee_bps,
                    metadata_url: "ipfs://workspace".into(),
                },
                ctx,
            )
        })
        .expect("create workspace");
        let ws = self
            .query(|s, st| s.factory.contract_address(st, &manager))
            .expect("workspace address");
        self.call(manager, |s, st, ctx| {
            s.workspace.set_registration_open(
                st,
                SetFlagParams {
                    workspace: ws,
                    value: true,
                },
                ctx,
            )?;
            s.workspace.set_require_invite(
                st,
                SetFlagParams {
                    workspace: ws,
                    value: false,
                },
                ctx,
            )
        })
        .expect("open registration");
        ws
    }

    pub fn register_client(&mut self, ws: AccountId, who: AccountId) {
        self.call(who, |s, st, ctx| {
            s.workspace
                .register_client(st, Self::self_registration(ws, who), ctx)
        })
        .expect("register client");
    }

    pub fn register_worker(&mut self, ws: AccountId, who: AccountId) {
        self.call(who, |s, st, ctx| {
            s.workspace
                .register_worker(st, Self::self_registration(ws, who), ctx)
        })
        .expect("register worker");
    }

    pub fn self_registration(workspace: AccountId, who: AccountId) -> RegisterParams {
        RegisterParams {
            workspace,
            metadata_url: "ipfs://profile".into(),
            who,
            invite_code: String::new(),
            contract_hash: [0u8; 32],
        }
    }

    /// Creates a job as `client` and returns its address.
    pub fn create_job(&mut self, ws: AccountId, client: AccountId) -> AccountId {
        self.call(client, |s, st, ctx| {
            s.workspace.create_job(
                st,
                CreateJobParams {
                    workspace: ws,
                    metadata_url: "ipfs://job".into(),
                    on_behalf_of: None,
                },
                ctx,
            )
        })
        .expect("create job");
        self.query(|s, st| s.workspace.client_jobs(st, &ws, &client))
            .expect("client jobs")
            .last()
            .copied()
            .expect("job address")
    }
}
