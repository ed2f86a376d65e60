// Path: crates/execution/tests/common/mod.rs
#![allow(dead_code)]

use dwork_api::ledger::TokenLedger;
use dwork_execution::MarketMachine;
use dwork_services::bank::TransferParams;
use dwork_services::factory::{
    CreateWorkSpaceParams, FactoryModule, SetAddressParams, SetLibraryParams,
};
use dwork_services::job::{AddAssignmentParams, JobRef};
use dwork_services::workspace::{
    AddWorkerParams, CreateJobParams, RegisterParams, SetFlagParams, WorkspaceModule,
};
use dwork_test_utils::assert_ok;
use dwork_test_utils::fixtures::{client, manager, owner, worker, UNIT};
use dwork_test_utils::LedgerToken;
use dwork_types::app::AccountId;
use dwork_types::config::{GenesisBalance, MarketConfig};
use dwork_types::service_configs::{BoardParams, DividendsParams, FactoryParams};
use std::sync::Arc;

/// `owner()` owns the factory and the pool and is the first maintainer. Clients and
/// workers start with 1000 units of native currency.
pub fn config() -> MarketConfig {
    MarketConfig {
        factory: FactoryParams {
            owner: owner(),
            ..Default::default()
        },
        dividends: DividendsParams {
            owner: owner(),
            ..Default::default()
        },
        board: BoardParams {
            initial_maintainer: owner(),
            ..Default::default()
        },
        genesis: vec![
            GenesisBalance {
                account: client(),
                amount: 1000 * UNIT,
            },
            GenesisBalance {
                account: worker(),
                amount: 1000 * UNIT,
            },
        ],
        ..Default::default()
    }
}

pub fn machine() -> MarketMachine {
    assert_ok!(MarketMachine::new(config(), Arc::new(LedgerToken::new())))
}

pub fn mint_tokens(m: &mut MarketMachine, who: &AccountId, amount: u128) {
    assert_ok!(LedgerToken::new().mint(m.state_mut(), who, amount));
}

pub fn approve(m: &mut MarketMachine, holder: &AccountId, spender: &AccountId, amount: u128) {
    let token = m.token().clone();
    assert_ok!(token.approve(m.state_mut(), holder, spender, amount));
}

pub fn tokens(m: &MarketMachine, who: &AccountId) -> u128 {
    assert_ok!(m.token().balance_of(m.state(), who))
}

pub fn native(m: &MarketMachine, who: &AccountId) -> u128 {
    assert_ok!(m.native_balance(who))
}

pub fn factory(m: &MarketMachine) -> &FactoryModule {
    m.service::<FactoryModule>().expect("factory registered")
}

pub async fn install_templates(m: &mut MarketMachine, with_pool: bool) {
    let lib = |tag: u8| SetLibraryParams {
        address: AccountId([tag; 32]),
    };
    assert_ok!(m.submit(owner(), "factory", "set_work_space_library", &lib(0x11)).await);
    assert_ok!(m.submit(owner(), "factory", "set_job_library_address", &lib(0x12)).await);
    if with_pool {
        let pool = config().dividends.address;
        assert_ok!(
            m.submit(
                owner(),
                "factory",
                "set_dividends_address",
                &SetAddressParams { address: pool }
            )
            .await
        );
    }
}

/// A workspace with open registration and no invites.
pub async fn open_workspace(m: &mut MarketMachine, fee_bps: u16) -> AccountId {
    assert_ok!(
        m.submit(
            manager(),
            "factory",
            "create_work_space",
            &CreateWorkSpaceParams {
                fee_bps,
                metadata_url: "ipfs://workspace".into(),
            }
        )
        .await
    );
    let ws = assert_ok!(factory(m).contract_address(m.state(), &manager()));
    for (method, value) in [("set_registration_open", true), ("set_require_invite", false)] {
        let params = SetFlagParams {
            workspace: ws,
            value,
        };
        assert_ok!(m.submit(manager(), "workspace", method, &params).await);
    }
    ws
}

pub fn registration(workspace: AccountId, who: AccountId) -> RegisterParams {
    RegisterParams {
        workspace,
        metadata_url: "ipfs://profile".into(),
        who,
        invite_code: String::new(),
        contract_hash: [0u8; 32],
    }
}

/// Registers `client()` and `worker()`, creates a job and assigns the worker.
pub async fn staffed_job(m: &mut MarketMachine, ws: AccountId) -> AccountId {
    assert_ok!(
        m.submit(client(), "workspace", "register_client", &registration(ws, client()))
            .await
    );
    assert_ok!(
        m.submit(worker(), "workspace", "register_worker", &registration(ws, worker()))
            .await
    );
    assert_ok!(
        m.submit(
            client(),
            "workspace",
            "create_job",
            &CreateJobParams {
                workspace: ws,
                metadata_url: "ipfs://job".into(),
                on_behalf_of: None,
            }
        )
        .await
    );
    let job = *assert_ok!(m
        .service::<WorkspaceModule>()
        .expect("workspace registered")
        .client_jobs(m.state(), &ws, &client()))
    .last()
    .expect("job created");
    assert_ok!(
        m.submit(
            client(),
            "workspace",
            "add_worker",
            &AddWorkerParams {
                workspace: ws,
                job,
                worker: worker(),
            }
        )
        .await
    );
    job
}

pub async fn deposit(m: &mut MarketMachine, from: AccountId, job: AccountId, amount: u128) {
    assert_ok!(
        m.submit(from, "bank", "transfer", &TransferParams { to: job, amount })
            .await
    );
}

/// Funds `job` with `amount` and walks one assignment to `Accepted`.
pub async fn accepted(m: &mut MarketMachine, job: AccountId, amount: u128) {
    deposit(m, client(), job, amount).await;
    assert_ok!(
        m.submit(
            client(),
            "job",
            "add_assignment",
            &AddAssignmentParams { job, ready: true }
        )
        .await
    );
    let job_ref = JobRef { job };
    assert_ok!(m.submit(worker(), "job", "start_work", &job_ref).await);
    assert_ok!(m.submit(worker(), "job", "mark_done", &job_ref).await);
    assert_ok!(m.submit(client(), "job", "mark_accepted", &job_ref).await);
}
