// Path: crates/types/src/app/events.rs

use crate::app::{AccountId, Role};
use parity_scale_codec::{Decode, Encode};
use serde::{Deserialize, Serialize};

/// Observable state changes, emitted for off-chain indexers and front-ends.
///
/// Events raised by a call are only published if the call commits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub enum MarketEvent {
    /// A manager created a workspace.
    WorkSpaceCreated {
        /// The creating manager.
        manager: AccountId,
        /// The new workspace address.
        workspace: AccountId,
        /// 1-based position in the manager's history.
        index: u64,
    },
    /// The workspace template was swapped.
    WorkSpaceLibraryVersion {
        /// The new template.
        library: AccountId,
        /// The new version stamp.
        version: u64,
    },
    /// The job template was swapped.
    JobLibraryVersion {
        /// The new template.
        library: AccountId,
        /// The new version stamp.
        version: u64,
    },
    /// The protocol fee changed.
    ContractFeeChange {
        /// Previous fee in bps.
        old_bps: u16,
        /// New fee in bps.
        new_bps: u16,
    },
    /// The factory disable switch changed.
    FactoryDisabled {
        /// New switch value.
        disabled: bool,
    },
    /// A client or worker registered.
    RegistrationSuccess {
        /// The workspace.
        workspace: AccountId,
        /// The registered address.
        who: AccountId,
        /// The registered role.
        role: Role,
    },
    /// A participant was disabled or re-enabled.
    Moderated {
        /// The workspace.
        workspace: AccountId,
        /// The moderated address.
        target: AccountId,
        /// The moderated role.
        role: Role,
        /// New moderation flag.
        disabled: bool,
    },
    /// A written contract was filed.
    WrittenContractAdded {
        /// The workspace.
        workspace: AccountId,
        /// Content hash.
        hash: [u8; 32],
    },
    /// A job was created.
    JobCreated {
        /// The workspace.
        workspace: AccountId,
        /// The new job address.
        job: AccountId,
        /// The client the job belongs to.
        client: AccountId,
    },
    /// A worker was assigned to a job.
    AddedWorker {
        /// The job.
        job: AccountId,
        /// The assigned worker.
        worker: AccountId,
    },
    /// The client changed a job's metadata.
    MetadataUrlChange {
        /// The job.
        job: AccountId,
        /// New pointer.
        metadata_url: String,
    },
    /// Native funds were deposited into a job.
    Deposit {
        /// The job.
        job: AccountId,
        /// The depositor.
        from: AccountId,
        /// Amount deposited.
        amount: u128,
    },
    /// An assignment was added.
    AssignmentAdded {
        /// The job.
        job: AccountId,
        /// 1-based assignment sequence.
        sequence: u64,
        /// Whether it starts ready.
        ready: bool,
    },
    /// An assignment was marked ready.
    AssignmentReady {
        /// The job.
        job: AccountId,
        /// Assignment sequence.
        sequence: u64,
    },
    /// The worker started.
    WorkStarted {
        /// The job.
        job: AccountId,
        /// Assignment sequence.
        sequence: u64,
    },
    /// The worker finished.
    WorkDone {
        /// The job.
        job: AccountId,
        /// Assignment sequence.
        sequence: u64,
    },
    /// The client accepted the work.
    AssignmentAccepted {
        /// The job.
        job: AccountId,
        /// Assignment sequence.
        sequence: u64,
    },
    /// The escrow was paid out.
    Withdraw {
        /// The job.
        job: AccountId,
        /// Assignment sequence.
        sequence: u64,
        /// Worker share.
        worker_amount: u128,
        /// Manager share.
        manager_amount: u128,
        /// Dividends share.
        dividends_amount: u128,
    },
    /// The client raised a dispute.
    DisputeRequested {
        /// The job.
        job: AccountId,
        /// The job's dispute counter after the increment.
        dispute_index: u64,
    },
    /// The manager ruled on a dispute.
    DisputeResolved {
        /// The job.
        job: AccountId,
        /// The dispute being resolved.
        dispute_index: u64,
        /// Whether the client gets a refund.
        refund: bool,
    },
    /// The escrow was returned to the client.
    Refund {
        /// The job.
        job: AccountId,
        /// Assignment sequence.
        sequence: u64,
        /// Amount refunded.
        amount: u128,
    },
    /// The client cancelled the job.
    JobKilled {
        /// The job.
        job: AccountId,
        /// Amount returned to the client.
        refunded: u128,
    },
    /// The dividends pool received revenue.
    Received {
        /// The sender.
        from: AccountId,
        /// Amount received.
        amount: u128,
    },
    /// A holder locked tokens and received a payout.
    Claim {
        /// The holder.
        holder: AccountId,
        /// Claim index.
        index: u64,
        /// Native payout.
        payout: u128,
        /// Tokens locked.
        amount: u128,
    },
    /// A holder took locked tokens back.
    TokenWithdraw {
        /// The holder.
        holder: AccountId,
        /// Claim index.
        index: u64,
        /// Tokens returned.
        amount: u128,
    },
    /// A holder took locked tokens back with a second payout.
    Reclaim {
        /// The holder.
        holder: AccountId,
        /// Claim index.
        index: u64,
        /// Native payout.
        payout: u128,
        /// Tokens returned.
        amount: u128,
    },
    /// Ownership of a collaborator changed hands.
    OwnershipTransferred {
        /// Previous owner.
        previous: AccountId,
        /// New owner.
        new_owner: AccountId,
    },
    /// A proposal was created.
    ProposalCreated {
        /// Proposal index.
        index: u64,
        /// The proposer.
        creator: AccountId,
        /// Topic label.
        topic: String,
    },
    /// A vote was cast.
    Vote {
        /// Proposal index.
        index: u64,
        /// The voter.
        voter: AccountId,
        /// In favour or against.
        support: bool,
        /// Token weight counted.
        weight: u128,
    },
    /// Voting closed.
    VotingClosed {
        /// Proposal index.
        index: u64,
        /// Outcome.
        passed: bool,
    },
    /// A passed proposal was applied.
    ProposalFulfilled {
        /// Proposal index.
        index: u64,
    },
    /// The maintainer set changed.
    MaintainerChanged {
        /// The affected account.
        who: AccountId,
        /// Whether it is now a maintainer.
        active: bool,
    },
    /// An owner updated its link set.
    Linked {
        /// The owner.
        owner: AccountId,
        /// History index of the new set.
        index: u64,
    },
}

impl MarketEvent {
    /// The event name as used by indexers.
    pub fn name(&self) -> &'static str {
        match self {
            MarketEvent::WorkSpaceCreated { .. } => "WorkSpaceCreated",
            MarketEvent::WorkSpaceLibraryVersion { .. } => "WorkSpaceLibraryVersion",
            MarketEvent::JobLibraryVersion { .. } => "JobLibraryVersion",
            MarketEvent::ContractFeeChange { .. } => "ContractFeeChange",
            MarketEvent::FactoryDisabled { .. } => "FactoryDisabled",
            MarketEvent::RegistrationSuccess { .. } => "RegistrationSuccess",
            MarketEvent::Moderated { .. } => "Moderated",
            MarketEvent::WrittenContractAdded { .. } => "WrittenContractAdded",
            MarketEvent::JobCreated { .. } => "JobCreated",
            MarketEvent::AddedWorker { .. } => "AddedWorker",
            MarketEvent::MetadataUrlChange { .. } => "MetadataUrlChange",
            MarketEvent::Deposit { .. } => "Deposit",
            MarketEvent::AssignmentAdded { .. } => "AssignmentAdded",
            MarketEvent::AssignmentReady { .. } => "AssignmentReady",
            MarketEvent::WorkStarted { .. } => "WorkStarted",
            MarketEvent::WorkDone { .. } => "WorkDone",
            MarketEvent::AssignmentAccepted { .. } => "AssignmentAccepted",
            MarketEvent::Withdraw { .. } => "Withdraw",
            MarketEvent::DisputeRequested { .. } => "DisputeRequested",
            MarketEvent::DisputeResolved { .. } => "DisputeResolved",
            MarketEvent::Refund { .. } => "Refund",
            MarketEvent::JobKilled { .. } => "JobKilled",
            MarketEvent::Received { .. } => "Received",
            MarketEvent::Claim { .. } => "Claim",
            MarketEvent::TokenWithdraw { .. } => "TokenWithdraw",
            MarketEvent::Reclaim { .. } => "Reclaim",
            MarketEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
            MarketEvent::ProposalCreated { .. } => "ProposalCreated",
            MarketEvent::Vote { .. } => "Vote",
            MarketEvent::VotingClosed { .. } => "VotingClosed",
            MarketEvent::ProposalFulfilled { .. } => "ProposalFulfilled",
            MarketEvent::MaintainerChanged { .. } => "MaintainerChanged",
            MarketEvent::Linked { .. } => "Linked",
        }
    }
}
