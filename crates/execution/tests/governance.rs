// Path: crates/execution/tests/governance.rs
mod common;

use common::*;
use dwork_execution::MarketMachine;
use dwork_services::board::{CreateProposalParams, ProposalIndexParams, VoteParams};
use dwork_services::factory::SetAddressParams;
use dwork_services::job::JobRef;
use dwork_test_utils::fixtures::{holder, manager, owner, stranger, worker, UNIT};
use dwork_test_utils::{assert_code, assert_ok};
use dwork_types::app::{MarketEvent, ProposalTopic};
use dwork_types::error::TransactionError;

async fn governed() -> MarketMachine {
    let mut m = machine();
    mint_tokens(&mut m, &holder(1), 20_000 * UNIT);
    mint_tokens(&mut m, &holder(2), 15_000 * UNIT);
    mint_tokens(&mut m, &holder(3), 5_000 * UNIT);
    let board = config().board.address;
    assert_ok!(
        m.submit(
            owner(),
            "factory",
            "set_board",
            &SetAddressParams { address: board }
        )
        .await
    );
    m
}

async fn propose(m: &mut MarketMachine, topic: ProposalTopic) -> u64 {
    let receipt = assert_ok!(
        m.submit(
            holder(1),
            "board",
            "create_proposal",
            &CreateProposalParams {
                metadata_url: "ipfs://proposal".into(),
                topic,
            }
        )
        .await
    );
    match receipt.events.last() {
        Some(MarketEvent::ProposalCreated { index, .. }) => *index,
        other => panic!("unexpected events: {:?}", other),
    }
}

async fn vote(
    m: &mut MarketMachine,
    who: dwork_types::app::AccountId,
    index: u64,
    support: bool,
) -> Result<(), TransactionError> {
    m.submit(who, "board", "vote", &VoteParams { index, support })
        .await
        .map(|_| ())
}

#[tokio::test]
async fn a_passed_fee_change_applies_to_later_payouts() {
    let mut m = governed().await;
    install_templates(&mut m, true).await;
    let index = propose(&mut m, ProposalTopic::FeeChange { bps: 300 }).await;
    assert_ok!(vote(&mut m, holder(1), index, true).await);
    assert_ok!(vote(&mut m, holder(3), index, false).await);

    m.advance(100);
    assert_code!(vote(&mut m, holder(2), index, false).await, "805");
    let closing = ProposalIndexParams { index };
    assert_ok!(m.submit(stranger(), "board", "close_voting", &closing).await);
    assert_code!(
        m.submit(holder(1), "board", "fulfill_proposal", &closing).await,
        "810"
    );
    let receipt = assert_ok!(m.submit(owner(), "board", "fulfill_proposal", &closing).await);
    assert_eq!(
        receipt.event_names(),
        vec!["ContractFeeChange", "ProposalFulfilled"]
    );
    assert_eq!(assert_ok!(factory(&m).contract_fee(m.state())), 300);

    let ws = open_workspace(&mut m, 2000).await;
    let job = staffed_job(&mut m, ws).await;
    accepted(&mut m, job, 100 * UNIT).await;
    assert_ok!(m.submit(worker(), "job", "withdraw", &JobRef { job }).await);
    assert_eq!(native(&m, &worker()), 1077 * UNIT);
    assert_eq!(native(&m, &manager()), 20 * UNIT);
    assert_eq!(native(&m, &config().dividends.address), 3 * UNIT);
}

#[tokio::test]
async fn a_tied_vote_changes_nothing() {
    let mut m = governed().await;
    let index = propose(&mut m, ProposalTopic::FactoryDisable { disabled: true }).await;
    assert_ok!(vote(&mut m, holder(1), index, true).await);
    assert_ok!(vote(&mut m, holder(2), index, false).await);
    assert_ok!(vote(&mut m, holder(3), index, false).await);
    m.advance(100);

    let closing = ProposalIndexParams { index };
    let receipt = assert_ok!(m.submit(stranger(), "board", "close_voting", &closing).await);
    assert!(matches!(
        receipt.events.last(),
        Some(MarketEvent::VotingClosed { passed: false, .. })
    ));
    assert_code!(
        m.submit(owner(), "board", "fulfill_proposal", &closing).await,
        "808"
    );
    assert!(!assert_ok!(factory(&m).is_disabled(m.state())));
}

#[tokio::test]
async fn the_board_can_switch_the_factory_off() {
    let mut m = governed().await;
    install_templates(&mut m, false).await;
    let index = propose(&mut m, ProposalTopic::FactoryDisable { disabled: true }).await;
    assert_ok!(vote(&mut m, holder(1), index, true).await);
    m.advance(100);
    let closing = ProposalIndexParams { index };
    assert_ok!(m.submit(stranger(), "board", "close_voting", &closing).await);
    assert_ok!(m.submit(owner(), "board", "fulfill_proposal", &closing).await);

    assert!(assert_ok!(factory(&m).is_disabled(m.state())));
    assert_code!(
        m.submit(
            manager(),
            "factory",
            "create_work_space",
            &dwork_services::factory::CreateWorkSpaceParams {
                fee_bps: 100,
                metadata_url: "ipfs://late".into(),
            }
        )
        .await,
        "501"
    );
}
