// Path: crates/types/src/service_configs/mod.rs
//! Configuration structures injected into services at construction.

use crate::app::AccountId;
use serde::{Deserialize, Serialize};

/// One whole token at 18 decimals.
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

/// Parameters for the registry factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryParams {
    /// The factory's own address; workspaces accept `initialize` only from it.
    pub address: AccountId,
    /// Initial owner.
    pub owner: AccountId,
    /// Initial protocol fee in basis points.
    pub contract_fee_bps: u16,
    /// Upper bound for the protocol fee.
    pub max_contract_fee_bps: u16,
    /// Upper bound for a workspace's manager fee.
    pub max_workspace_fee_bps: u16,
}

impl Default for FactoryParams {
    fn default() -> Self {
        Self {
            address: AccountId([0xfa; 32]),
            owner: AccountId::ZERO,
            contract_fee_bps: 100,
            max_contract_fee_bps: 1000,
            max_workspace_fee_bps: 5000,
        }
    }
}

/// Parameters shared by all job instances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobParams {
    /// Escrow a job must hold before work can start.
    #[serde(with = "crate::config::amount")]
    pub min_start_balance: u128,
}

impl Default for JobParams {
    fn default() -> Self {
        Self {
            min_start_balance: 1,
        }
    }
}

/// Parameters for the dividends pool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DividendsParams {
    /// The pool's own address; native revenue sent here is counted.
    pub address: AccountId,
    /// Initial owner.
    pub owner: AccountId,
    /// Blocks a claim stays locked.
    pub lock_time_in_blocks: u64,
}

impl Default for DividendsParams {
    fn default() -> Self {
        Self {
            address: AccountId([0xd1; 32]),
            owner: AccountId::ZERO,
            lock_time_in_blocks: 100,
        }
    }
}

/// Parameters for the governance board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardParams {
    /// The board's own address; the factory treats calls from it as board calls.
    pub address: AccountId,
    /// The first maintainer.
    pub initial_maintainer: AccountId,
    /// Token balance required to create a proposal.
    #[serde(with = "crate::config::amount")]
    pub min_share: u128,
    /// Voting window in blocks.
    pub expiry_blocks: u64,
    /// Blocks a creator must wait between proposals.
    pub rate_limit_blocks: u64,
}

impl Default for BoardParams {
    fn default() -> Self {
        Self {
            address: AccountId([0xb0; 32]),
            initial_maintainer: AccountId::ZERO,
            min_share: 10_000 * TOKEN_UNIT,
            expiry_blocks: 100,
            rate_limit_blocks: 10,
        }
    }
}

bitflags::bitflags! {
    /// A bitmask representing the hooks a service exposes besides its callable methods.
    #[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
    #[serde(transparent)]
    pub struct Capabilities: u32 {
        /// The service accepts native currency for some addresses and runs a hook on receipt.
        const NATIVE_RECEIVER = 0b0000_0001;
    }
}
