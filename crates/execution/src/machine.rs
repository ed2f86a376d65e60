// Path: crates/execution/src/machine.rs
use crate::error::ExecutionError;
use dwork_api::ledger::TokenLedger;
use dwork_api::services::access::ServiceDirectory;
use dwork_api::services::BlockchainService;
use dwork_api::state::{StateAccess, StateOverlay};
use dwork_api::transaction::context::TxContext;
use dwork_services::bank::{self, BankModule};
use dwork_services::board::BoardModule;
use dwork_services::dividends::DividendsModule;
use dwork_services::factory::FactoryModule;
use dwork_services::job::JobModule;
use dwork_services::link::LinkModule;
use dwork_services::workspace::WorkspaceModule;
use dwork_state::MemoryStore;
use dwork_telemetry::time::DispatchTimer;
use dwork_telemetry::{error_metrics, market_metrics, service_metrics};
use dwork_types::app::{AccountId, MarketEvent};
use dwork_types::config::MarketConfig;
use dwork_types::error::{ErrorCode, TransactionError};
use parity_scale_codec::Encode;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

/// The outcome of a committed call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Height the call ran at.
    pub height: u64,
    /// Events in emission order.
    pub events: Vec<MarketEvent>,
}

impl Receipt {
    /// Names of the emitted events, in order.
    pub fn event_names(&self) -> Vec<&'static str> {
        self.events.iter().map(MarketEvent::name).collect()
    }
}

/// Runs marketplace calls against a single state store.
///
/// Every call executes on a fresh `StateOverlay`. Only a successful call has its
/// writes applied to the store and its events returned; a failing call leaves the
/// store exactly as it was, including writes made by nested calls and receive hooks.
pub struct MarketMachine {
    store: MemoryStore,
    services: ServiceDirectory,
    token: Arc<dyn TokenLedger>,
    height: u64,
}

impl fmt::Debug for MarketMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketMachine")
            .field("services", &self.services)
            .field("height", &self.height)
            .field("keys", &self.store.len())
            .field("token", &"Arc<dyn TokenLedger>")
            .finish()
    }
}

impl MarketMachine {
    /// Builds the standard service set from `config` and runs genesis.
    pub fn new(config: MarketConfig, token: Arc<dyn TokenLedger>) -> Result<Self, ExecutionError> {
        Self::with_services(config, token, Vec::new())
    }

    /// Like [`MarketMachine::new`], with additional services registered next to the
    /// marketplace components.
    pub fn with_services(
        config: MarketConfig,
        token: Arc<dyn TokenLedger>,
        extra: Vec<Arc<dyn BlockchainService>>,
    ) -> Result<Self, ExecutionError> {
        let factory = Arc::new(FactoryModule::new(config.factory.clone()));
        let board = Arc::new(BoardModule::new(config.board.clone(), token.clone()));

        let mut services: Vec<Arc<dyn BlockchainService>> = vec![
            Arc::new(BankModule::new()),
            Arc::new(WorkspaceModule::new(&config.factory)),
            factory.clone(),
            Arc::new(JobModule::new(config.job.clone())),
            Arc::new(DividendsModule::new(config.dividends.clone(), token.clone())),
            board.clone(),
            Arc::new(LinkModule::new()),
        ];
        services.extend(extra);

        let mut seen = BTreeSet::new();
        for service in &services {
            if !seen.insert(service.id().to_string()) {
                return Err(ExecutionError::DuplicateService(service.id().to_string()));
            }
        }

        let mut store = MemoryStore::new();
        factory.genesis(&mut store)?;
        board.genesis(&mut store)?;
        for balance in &config.genesis {
            bank::mint(&mut store, &balance.account, balance.amount)?;
        }

        tracing::info!(
            target: "execution",
            event = "genesis",
            services = seen.len(),
            funded = config.genesis.len(),
            "marketplace ready"
        );

        Ok(Self {
            store,
            services: ServiceDirectory::new(services),
            token,
            height: 1,
        })
    }

    /// Dispatches `method` (without the `@v1` suffix) on `service_id` as `signer` and
    /// commits the result if it succeeds.
    pub async fn submit<P: Encode>(
        &mut self,
        signer: AccountId,
        service_id: &str,
        method: &str,
        params: &P,
    ) -> Result<Receipt, TransactionError> {
        let events = self.execute(signer, service_id, method, params, false).await?;
        for event in &events {
            market_metrics().inc_events(event.name());
        }
        market_metrics().inc_calls_committed();
        Ok(Receipt {
            height: self.height,
            events,
        })
    }

    /// Runs a call and reports its outcome without committing anything.
    pub async fn simulate<P: Encode>(
        &mut self,
        signer: AccountId,
        service_id: &str,
        method: &str,
        params: &P,
    ) -> Result<Receipt, TransactionError> {
        let events = self.execute(signer, service_id, method, params, true).await?;
        Ok(Receipt {
            height: self.height,
            events,
        })
    }

    async fn execute<P: Encode>(
        &mut self,
        signer: AccountId,
        service_id: &str,
        method: &str,
        params: &P,
        simulation: bool,
    ) -> Result<Vec<MarketEvent>, TransactionError> {
        let service = self.services.find(service_id).cloned().ok_or_else(|| {
            TransactionError::Unsupported(format!("Service '{}' is not registered", service_id))
        })?;
        let qualified = format!("{}@v1", method);
        let encoded = params.encode();

        let outcome = {
            let _timer = DispatchTimer::new(service_metrics(), service_id, &qualified);
            let mut overlay = StateOverlay::new(&self.store);
            let mut ctx = TxContext::new(self.height, signer, &self.services);
            ctx.simulation = simulation;
            let result = service
                .handle_service_call(&mut overlay, &qualified, &encoded, &mut ctx)
                .await;
            result.map(|()| (overlay.into_ordered_batch(), ctx.events))
        };

        match outcome {
            Ok(((inserts, deletes), events)) => {
                if !simulation {
                    self.store.batch_apply(&inserts, &deletes)?;
                    tracing::debug!(
                        target: "execution",
                        event = "commit",
                        service = service_id,
                        method = %qualified,
                        writes = inserts.len() + deletes.len(),
                        events = events.len()
                    );
                }
                Ok(events)
            }
            Err(e) => {
                service_metrics().inc_dispatch_error(service_id, &qualified, e.code());
                error_metrics().inc_error(e.kind().as_str(), e.code());
                tracing::warn!(
                    target: "execution",
                    event = "rejected",
                    service = service_id,
                    method = %qualified,
                    signer = %signer,
                    code = e.code(),
                    error = %e
                );
                Err(e)
            }
        }
    }

    /// Moves to a later block.
    pub fn advance(&mut self, blocks: u64) {
        self.height = self.height.saturating_add(blocks);
        market_metrics().set_block_height(self.height);
    }

    /// The height the next call runs at.
    pub fn height(&self) -> u64 {
        self.height
    }

    /// Committed state.
    pub fn state(&self) -> &MemoryStore {
        &self.store
    }

    /// Mutable access to committed state, for collaborators that live outside the
    /// marketplace such as the token ledger.
    pub fn state_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    /// The registered services.
    pub fn services(&self) -> &ServiceDirectory {
        &self.services
    }

    /// A registered service by type.
    pub fn service<T: BlockchainService>(&self) -> Option<&T> {
        self.services.get::<T>()
    }

    /// The token ledger the dividends pool and the board use.
    pub fn token(&self) -> &Arc<dyn TokenLedger> {
        &self.token
    }

    /// Native balance of `who`.
    pub fn native_balance(&self, who: &AccountId) -> Result<u128, TransactionError> {
        Ok(bank::balance_of(&self.store, who)?)
    }

    /// Commitment over the whole committed state.
    pub fn root_hash(&self) -> [u8; 32] {
        self.store.root_hash()
    }
}
