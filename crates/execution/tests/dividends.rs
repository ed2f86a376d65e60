// Path: crates/execution/tests/dividends.rs
mod common;

use common::*;
use dwork_execution::MarketMachine;
use dwork_services::bank::TransferParams;
use dwork_services::dividends::{ClaimDividendsParams, ClaimIndexParams, DividendsModule};
use dwork_services::job::JobRef;
use dwork_test_utils::fixtures::{holder, stranger, worker, UNIT};
use dwork_test_utils::{assert_code, assert_ok, LedgerToken};
use dwork_types::app::MarketEvent;
use dwork_types::config::GenesisBalance;
use std::sync::Arc;

const SUPPLY: u128 = 30_000_000 * UNIT;
const REVENUE: u128 = 1000 * UNIT;

/// 1000 units of revenue in the pool, 10 of 30M tokens held by `holder(1)` and approved.
async fn funded() -> MarketMachine {
    let mut cfg = config();
    cfg.genesis.push(GenesisBalance {
        account: stranger(),
        amount: REVENUE,
    });
    let mut m = assert_ok!(MarketMachine::new(cfg, Arc::new(LedgerToken::new())));
    let pool = config().dividends.address;
    assert_ok!(
        m.submit(
            stranger(),
            "bank",
            "transfer",
            &TransferParams {
                to: pool,
                amount: REVENUE
            }
        )
        .await
    );
    mint_tokens(&mut m, &holder(1), 10 * UNIT);
    mint_tokens(&mut m, &holder(2), SUPPLY - 10 * UNIT);
    approve(&mut m, &holder(1), &pool, 10 * UNIT);
    m
}

fn pool_module(m: &MarketMachine) -> &DividendsModule {
    m.service::<DividendsModule>().expect("dividends registered")
}

#[tokio::test]
async fn a_claim_pays_the_holders_share_and_locks_the_tokens() {
    let mut m = funded().await;
    let pool = config().dividends.address;

    let receipt = assert_ok!(
        m.submit(
            holder(1),
            "dividends",
            "claim_dividends",
            &ClaimDividendsParams { amount: 10 * UNIT }
        )
        .await
    );
    let payout = 333_333_333_333_333;
    assert!(matches!(
        receipt.events.last(),
        Some(MarketEvent::Claim { payout: p, .. }) if *p == payout
    ));
    assert_eq!(native(&m, &holder(1)), payout);
    assert_eq!(native(&m, &pool), REVENUE - payout);
    assert_eq!(tokens(&m, &holder(1)), 0);
    assert_eq!(tokens(&m, &pool), 10 * UNIT);

    m.advance(99);
    let index = ClaimIndexParams { index: 1 };
    assert_code!(
        m.submit(holder(1), "dividends", "withdraw_token", &index).await,
        "705"
    );
    m.advance(1);
    assert_ok!(m.submit(holder(1), "dividends", "withdraw_token", &index).await);
    assert_eq!(tokens(&m, &holder(1)), 10 * UNIT);
    assert_eq!(assert_ok!(pool_module(&m).managed_tokens(m.state())), 0);
    assert_code!(
        m.submit(holder(1), "dividends", "reclaim_dividends", &index).await,
        "704"
    );
}

#[tokio::test]
async fn a_failed_claim_moves_no_tokens() {
    let mut m = funded().await;
    let root = m.root_hash();
    assert_code!(
        m.submit(
            holder(1),
            "dividends",
            "claim_dividends",
            &ClaimDividendsParams { amount: 11 * UNIT }
        )
        .await,
        "701"
    );
    assert_eq!(m.root_hash(), root);
    assert_eq!(tokens(&m, &holder(1)), 10 * UNIT);
}

#[tokio::test]
async fn protocol_fees_from_jobs_fund_the_pool() {
    let mut m = machine();
    install_templates(&mut m, true).await;
    let ws = open_workspace(&mut m, 2000).await;
    let job = staffed_job(&mut m, ws).await;
    accepted(&mut m, job, 100 * UNIT).await;
    assert_ok!(m.submit(worker(), "job", "withdraw", &JobRef { job }).await);

    let pool = config().dividends.address;
    assert_eq!(assert_ok!(pool_module(&m).total_balance(m.state())), UNIT);

    // A tenth of the supply earns a tenth of the pool.
    mint_tokens(&mut m, &holder(1), 10 * UNIT);
    mint_tokens(&mut m, &holder(2), 90 * UNIT);
    approve(&mut m, &holder(1), &pool, 10 * UNIT);
    assert_ok!(
        m.submit(
            holder(1),
            "dividends",
            "claim_dividends",
            &ClaimDividendsParams { amount: 10 * UNIT }
        )
        .await
    );
    assert_eq!(native(&m, &holder(1)), UNIT / 10);
}
