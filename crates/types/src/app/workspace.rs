// Path: crates/types/src/app/workspace.rs
//! Records owned by a workspace instance.

use crate::app::{AccountId, LibraryRef};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Participant roles a workspace can register.
#[derive(Encode, Decode, Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Commissions jobs and funds them.
    Client,
    /// Performs assignments and withdraws payouts.
    Worker,
}

impl Role {
    /// The opposite participant role.
    pub fn other(self) -> Role {
        match self {
            Role::Client => Role::Worker,
            Role::Worker => Role::Client,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Worker => write!(f, "worker"),
        }
    }
}

/// The caller's relationship to a workspace or job, as reported by `who_am_i`.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerRole {
    /// Not associated.
    Unknown,
    /// The workspace manager.
    Manager,
    /// A registered client.
    Client,
    /// A registered worker.
    Worker,
}

impl CallerRole {
    /// The numeric role code exposed to front-ends.
    pub fn code(self) -> u16 {
        match self {
            CallerRole::Unknown => 200,
            CallerRole::Manager => 201,
            CallerRole::Client => 202,
            CallerRole::Worker => 203,
        }
    }
}

/// A registered client or worker.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// Which role this address holds. Never changes after registration.
    pub role: Role,
    /// Off-chain profile pointer.
    pub metadata_url: String,
    /// Set once on registration and never reset.
    pub initialized: bool,
    /// Moderation flag.
    pub disabled: bool,
    /// The written-contract hash the participant agreed to when registering.
    pub contract_hash: [u8; 32],
    /// Block height of registration.
    pub registered_at: u64,
}

/// An entry of the append-only written-contract audit trail.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct WrittenContract {
    /// Content hash of the agreement text.
    pub hash: [u8; 32],
    /// Where the agreement text is published.
    pub url: String,
    /// Block height at which it was filed.
    pub added_at: u64,
}

/// State of one workspace instance.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceState {
    /// The workspace's own address.
    pub address: AccountId,
    /// The owning manager.
    pub manager: AccountId,
    /// The factory that created this instance.
    pub factory: AccountId,
    /// Off-chain description pointer.
    pub metadata_url: String,
    /// Manager's cut of every job payout, in basis points.
    pub fee_bps: u16,
    /// Whether new registrations are accepted.
    pub registration_open: bool,
    /// Whether registrations must present an invite code.
    pub require_invite: bool,
    /// The workspace template this instance was created from.
    pub workspace_library: LibraryRef,
    /// The job template in force when this instance was created.
    pub job_library: LibraryRef,
    /// Hash of the agreement currently offered to clients.
    pub current_client_contract: Option<[u8; 32]>,
    /// Hash of the agreement currently offered to workers.
    pub current_worker_contract: Option<[u8; 32]>,
    /// Number of jobs created so far.
    pub job_count: u64,
    /// Block height of creation.
    pub created_at: u64,
}
