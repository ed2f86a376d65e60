// Path: crates/types/src/error/mod.rs
//! Core error types for the dwork marketplace.
//!
//! Every component has its own enum. Each variant maps 1:1 to a stable three-digit
//! code, which integration tests and front-ends match on, and to one of the five
//! [`ErrorKind`] classes.

use crate::app::Role;
use thiserror::Error;

/// The class of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Wrong caller or role.
    Authorization,
    /// The operation is invalid in the current state.
    StateViolation,
    /// Zero address, out-of-range index, fee above cap.
    InvalidInput,
    /// Insufficient balance or allowance.
    ResourceExhausted,
    /// Re-invoking a terminal operation.
    AlreadyFinalized,
}

impl ErrorKind {
    /// Label used for metrics.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Authorization => "authorization",
            ErrorKind::StateViolation => "state_violation",
            ErrorKind::InvalidInput => "invalid_input",
            ErrorKind::ResourceExhausted => "resource_exhausted",
            ErrorKind::AlreadyFinalized => "already_finalized",
        }
    }
}

/// A trait for assigning a stable, machine-readable code and class to an error.
pub trait ErrorCode {
    /// Returns the unique, stable identifier for this error variant.
    fn code(&self) -> &'static str;
    /// Returns the class of this error.
    fn kind(&self) -> ErrorKind;
}

/// Errors related to the state backend.
#[derive(Error, Debug)]
pub enum StateError {
    /// The requested key was not found in the state.
    #[error("Key not found in state")]
    KeyNotFound,
    /// An error occurred in the state backend.
    #[error("State backend error: {0}")]
    Backend(String),
    /// The stored value was invalid.
    #[error("Invalid value: {0}")]
    InvalidValue(String),
    /// An error occurred during state deserialization.
    #[error("Decode error: {0}")]
    Decode(String),
}

impl ErrorCode for StateError {
    fn code(&self) -> &'static str {
        match self {
            Self::KeyNotFound => "STATE_KEY_NOT_FOUND",
            Self::Backend(_) => "STATE_BACKEND_ERROR",
            Self::InvalidValue(_) => "STATE_INVALID_VALUE",
            Self::Decode(_) => "STATE_DECODE_ERROR",
        }
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::StateViolation
    }
}

/// Errors raised by the registry factory.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FactoryError {
    /// A required address was the zero address.
    #[error("zero address")]
    ZeroAddress,
    /// The factory is disabled.
    #[error("factory is disabled")]
    FactoryDisabled,
    /// The workspace or job template was never set.
    #[error("workspace or job template not set")]
    TemplateNotSet,
    /// The manager already has a live workspace on the current templates.
    #[error("no new template version since the manager's last workspace")]
    NoNewTemplate,
    /// The caller is not the factory owner (or board, where accepted).
    #[error("caller is not the factory owner")]
    NotOwner,
    /// The caller is not the governance board.
    #[error("caller is not the board")]
    NotBoard,
    /// No workspace at the requested index or for the requested manager.
    #[error("workspace not found")]
    WorkspaceNotFound,
    /// The workspace fee is above the 50% cap.
    #[error("workspace fee {0} bps exceeds the cap")]
    InvalidFee(u16),
    /// The protocol fee is above its cap.
    #[error("contract fee {0} bps exceeds the cap")]
    FeeTooHigh(u16),
}

impl ErrorCode for FactoryError {
    fn code(&self) -> &'static str {
        match self {
            Self::ZeroAddress => "500",
            Self::FactoryDisabled => "501",
            Self::TemplateNotSet => "502",
            Self::NoNewTemplate => "503",
            Self::NotOwner => "504",
            Self::WorkspaceNotFound => "505",
            Self::FeeTooHigh(_) => "521",
            Self::InvalidFee(_) => "552",
            Self::NotBoard => "557",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner | Self::NotBoard => ErrorKind::Authorization,
            Self::FactoryDisabled | Self::TemplateNotSet | Self::NoNewTemplate => {
                ErrorKind::StateViolation
            }
            Self::ZeroAddress
            | Self::WorkspaceNotFound
            | Self::InvalidFee(_)
            | Self::FeeTooHigh(_) => ErrorKind::InvalidInput,
        }
    }
}

/// Errors raised by a workspace.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError {
    /// A required address was the zero address.
    #[error("zero address")]
    ZeroAddress,
    /// No workspace exists at the given address.
    #[error("unknown workspace")]
    UnknownWorkspace,
    /// The caller is not the workspace manager.
    #[error("caller is not the manager")]
    NotManager,
    /// `initialize` was called by someone other than the factory.
    #[error("caller is not the factory")]
    NotFactory,
    /// `initialize` was called twice.
    #[error("workspace already initialized")]
    AlreadyInitialized,
    /// The manager tried to register itself.
    #[error("manager cannot register as {0}")]
    ManagerCannotRegister(Role),
    /// A non-manager tried to register an address other than its own.
    #[error("only the manager may register another address as {0}")]
    ThirdPartyRegistration(Role),
    /// Registration is closed.
    #[error("{0} registration is closed")]
    RegistrationClosed(Role),
    /// Invites are required and the code is absent or unknown.
    #[error("a valid invite code is required")]
    InviteRequired,
    /// The address already holds the other role.
    #[error("address is already registered with the other role while registering as {0}")]
    AlreadyOtherRole(Role),
    /// The address already holds this role.
    #[error("address is already registered as {0}")]
    AlreadyRegistered(Role),
    /// The target does not hold the role.
    #[error("address is not a registered {0}")]
    NotRegistered(Role),
    /// `create_job` target is not a registered client.
    #[error("unknown client")]
    UnknownClient,
    /// The client is disabled.
    #[error("client is disabled")]
    ClientDisabled,
    /// `create_job` caller is neither the manager nor a client.
    #[error("caller may not create jobs")]
    Unauthorized,
    /// A client tried to create a job for someone else.
    #[error("clients may only create jobs for themselves")]
    OnBehalfForbidden,
    /// The worker is disabled.
    #[error("worker is disabled")]
    WorkerDisabled,
    /// The caller is neither the job's client nor the manager.
    #[error("caller is not the job's client or manager")]
    NotJobParticipant,
    /// The job does not belong to this workspace.
    #[error("job belongs to another workspace")]
    ForeignJob,
    /// The workspace fee is above the 50% cap.
    #[error("workspace fee {0} bps exceeds the cap")]
    InvalidFee(u16),
    /// The contract hash was never filed.
    #[error("written contract not found")]
    ContractNotFound,
    /// The contract hash is already on file.
    #[error("written contract already filed")]
    ContractExists,
}

impl ErrorCode for WorkspaceError {
    fn code(&self) -> &'static str {
        match self {
            Self::ZeroAddress => "500",
            Self::UnknownClient => "507",
            Self::ClientDisabled => "508",
            Self::Unauthorized => "509",
            Self::NotManager => "510",
            Self::AlreadyInitialized => "511",
            Self::ManagerCannotRegister(Role::Worker) => "512",
            Self::RegistrationClosed(Role::Worker) => "513",
            Self::AlreadyOtherRole(Role::Worker) => "514",
            Self::AlreadyOtherRole(Role::Client) => "515",
            Self::ManagerCannotRegister(Role::Client) => "516",
            Self::RegistrationClosed(Role::Client) => "517",
            Self::NotFactory => "520",
            Self::ThirdPartyRegistration(Role::Worker) => "549",
            Self::ThirdPartyRegistration(Role::Client) => "550",
            Self::InvalidFee(_) => "552",
            Self::AlreadyRegistered(Role::Worker) => "553",
            Self::AlreadyRegistered(Role::Client) => "554",
            Self::NotRegistered(Role::Worker) => "555",
            Self::NotRegistered(Role::Client) => "556",
            Self::OnBehalfForbidden => "558",
            Self::WorkerDisabled => "560",
            Self::NotJobParticipant => "561",
            Self::ForeignJob => "562",
            Self::ContractNotFound => "563",
            Self::ContractExists => "564",
            Self::UnknownWorkspace => "565",
            Self::InviteRequired => "587",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotManager
            | Self::NotFactory
            | Self::ThirdPartyRegistration(_)
            | Self::InviteRequired
            | Self::ClientDisabled
            | Self::Unauthorized
            | Self::OnBehalfForbidden
            | Self::WorkerDisabled
            | Self::NotJobParticipant => ErrorKind::Authorization,
            Self::RegistrationClosed(_) | Self::AlreadyOtherRole(_) => ErrorKind::StateViolation,
            Self::AlreadyInitialized | Self::AlreadyRegistered(_) | Self::ContractExists => {
                ErrorKind::AlreadyFinalized
            }
            Self::ZeroAddress
            | Self::UnknownWorkspace
            | Self::ManagerCannotRegister(_)
            | Self::NotRegistered(_)
            | Self::UnknownClient
            | Self::ForeignJob
            | Self::InvalidFee(_)
            | Self::ContractNotFound => ErrorKind::InvalidInput,
        }
    }
}

/// Errors raised by a job.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    /// The caller is not the job's client.
    #[error("caller is not the client")]
    NotClient,
    /// The caller is not the assigned worker.
    #[error("caller is not the assigned worker")]
    NotWorker,
    /// The caller is not the workspace manager.
    #[error("caller is not the manager")]
    NotManager,
    /// `initialize` was called by someone other than the owning workspace.
    #[error("caller is not the owning workspace")]
    NotWorkspace,
    /// `initialize` was called twice.
    #[error("job already initialized")]
    AlreadyInitialized,
    /// No job exists at the given address.
    #[error("job not found")]
    JobNotFound,
    /// The job was killed.
    #[error("job was killed")]
    JobKilled,
    /// The active assignment is not terminal yet.
    #[error("prior assignment is still open")]
    PriorAssignmentOpen,
    /// No assignment was added.
    #[error("no assignment")]
    NoAssignment,
    /// The assignment was already marked ready.
    #[error("assignment already ready")]
    AlreadyReady,
    /// The assignment is not ready.
    #[error("assignment not ready")]
    NotReady,
    /// The worker already started.
    #[error("work already started")]
    WorkAlreadyStarted,
    /// The escrow is below the minimum to start.
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Escrowed amount.
        have: u128,
        /// Required minimum.
        need: u128,
    },
    /// The worker has not started.
    #[error("work not started")]
    WorkNotStarted,
    /// The worker already reported completion.
    #[error("work already done")]
    WorkAlreadyDone,
    /// The work is not done.
    #[error("work not done")]
    NotDone,
    /// The assignment was already accepted.
    #[error("assignment already accepted")]
    AlreadyAccepted,
    /// A dispute is open.
    #[error("dispute is open")]
    DisputeOpen,
    /// Nothing can be disputed.
    #[error("nothing to dispute")]
    NothingToDispute,
    /// A dispute is already waiting for the manager.
    #[error("dispute already open")]
    DisputeAlreadyOpen,
    /// There is no dispute to resolve.
    #[error("no open dispute")]
    NoOpenDispute,
    /// Withdrawal requires an accepted assignment.
    #[error("assignment not accepted")]
    NotAccepted,
    /// The escrow is empty.
    #[error("nothing to withdraw")]
    NothingToWithdraw,
    /// Refund requires a refund ruling.
    #[error("assignment not refunded")]
    NotRefunded,
    /// The escrow is empty.
    #[error("nothing to refund")]
    NothingToRefund,
    /// The job can only be killed before the assignment is ready.
    #[error("job cannot be killed once the assignment is ready")]
    KillNotAllowed,
    /// A payout operation was re-entered.
    #[error("re-entrant call")]
    Reentrancy,
    /// The accepted assignment has not been paid out yet.
    #[error("accepted assignment awaits payout")]
    PayoutPending,
}

impl ErrorCode for JobError {
    fn code(&self) -> &'static str {
        match self {
            Self::NotClient => "600",
            Self::NotWorker => "601",
            Self::NotManager => "602",
            Self::JobNotFound => "603",
            Self::JobKilled => "604",
            Self::PriorAssignmentOpen => "605",
            Self::NoAssignment => "606",
            Self::AlreadyReady => "607",
            Self::NotReady => "608",
            Self::WorkAlreadyStarted => "609",
            Self::InsufficientBalance { .. } => "610",
            Self::WorkNotStarted => "611",
            Self::WorkAlreadyDone => "612",
            Self::NotDone => "613",
            Self::DisputeOpen => "614",
            Self::NothingToDispute => "615",
            Self::DisputeAlreadyOpen => "616",
            Self::NoOpenDispute => "617",
            Self::NotAccepted => "618",
            Self::NothingToWithdraw => "619",
            Self::NotRefunded => "620",
            Self::NothingToRefund => "621",
            Self::KillNotAllowed => "622",
            Self::Reentrancy => "623",
            Self::NotWorkspace => "624",
            Self::AlreadyInitialized => "625",
            Self::AlreadyAccepted => "626",
            Self::PayoutPending => "627",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotClient
            | Self::NotWorker
            | Self::NotManager
            | Self::NotWorkspace
            | Self::Reentrancy => ErrorKind::Authorization,
            Self::InsufficientBalance { .. }
            | Self::NothingToWithdraw
            | Self::NothingToRefund => ErrorKind::ResourceExhausted,
            Self::AlreadyInitialized | Self::AlreadyReady | Self::AlreadyAccepted => {
                ErrorKind::AlreadyFinalized
            }
            Self::JobNotFound => ErrorKind::InvalidInput,
            _ => ErrorKind::StateViolation,
        }
    }
}

/// Errors raised by the dividends pool.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DividendsError {
    /// A required address was the zero address.
    #[error("zero address")]
    ZeroAddress,
    /// Claims must lock a positive amount.
    #[error("amount must be positive")]
    ZeroAmount,
    /// The holder has not approved enough tokens.
    #[error("allowance {allowance} below requested {requested}")]
    AllowanceInsufficient {
        /// Approved amount.
        allowance: u128,
        /// Requested amount.
        requested: u128,
    },
    /// Index 0 is never valid.
    #[error("claim indexes start at 1")]
    InvalidIndex,
    /// No claim at the index.
    #[error("claim {0} not found")]
    NotFound(u64),
    /// The claim was already withdrawn or reclaimed.
    #[error("claim already finalized")]
    AlreadyFinalized,
    /// The lock window has not elapsed.
    #[error("balance locked until block {unlock_at}")]
    BalanceLocked {
        /// First height at which the claim unlocks.
        unlock_at: u64,
    },
    /// The caller is not the pool owner.
    #[error("caller is not the dividends owner")]
    NotOwner,
    /// There are no stray tokens to recover.
    #[error("no stray tokens to recover")]
    NothingToRecover,
}

impl ErrorCode for DividendsError {
    fn code(&self) -> &'static str {
        match self {
            Self::ZeroAddress => "500",
            Self::ZeroAmount => "700",
            Self::AllowanceInsufficient { .. } => "701",
            Self::InvalidIndex => "702",
            Self::NotFound(_) => "703",
            Self::AlreadyFinalized => "704",
            Self::BalanceLocked { .. } => "705",
            Self::NotOwner => "706",
            Self::NothingToRecover => "707",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOwner => ErrorKind::Authorization,
            Self::AllowanceInsufficient { .. } | Self::NothingToRecover => {
                ErrorKind::ResourceExhausted
            }
            Self::AlreadyFinalized => ErrorKind::AlreadyFinalized,
            Self::BalanceLocked { .. } => ErrorKind::StateViolation,
            Self::ZeroAddress | Self::ZeroAmount | Self::InvalidIndex | Self::NotFound(_) => {
                ErrorKind::InvalidInput
            }
        }
    }
}

/// Errors raised by the governance board.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    /// A required address was the zero address.
    #[error("zero address")]
    ZeroAddress,
    /// The proposer holds fewer tokens than the minimum share.
    #[error("insufficient shares: have {have}, need {need}")]
    InsufficientShares {
        /// Proposer balance.
        have: u128,
        /// Required minimum.
        need: u128,
    },
    /// The proposer's previous proposal is too recent.
    #[error("proposal rate limit: next allowed at block {next_allowed}")]
    RateLimited {
        /// First height at which the proposer may propose again.
        next_allowed: u64,
    },
    /// No proposal at the index.
    #[error("proposal {0} not found")]
    NotFound(u64),
    /// The voter already voted.
    #[error("already voted")]
    AlreadyVoted,
    /// Voting was closed.
    #[error("voting closed")]
    VotingClosed,
    /// The voting window elapsed.
    #[error("proposal expired")]
    Expired,
    /// The voting window has not elapsed.
    #[error("voting open until block {expires_at}")]
    NotYetExpired {
        /// First height at which closing is allowed.
        expires_at: u64,
    },
    /// Voting was already closed.
    #[error("voting already closed")]
    AlreadyClosed,
    /// The proposal did not pass or was not closed.
    #[error("proposal not accepted")]
    NotAccepted,
    /// The proposal was already applied.
    #[error("proposal already fulfilled")]
    AlreadyFulfilled,
    /// The caller is not a maintainer.
    #[error("caller is not a maintainer")]
    NotMaintainer,
    /// The last maintainer cannot be revoked.
    #[error("cannot revoke the last maintainer")]
    LastMaintainer,
    /// The voter holds no tokens.
    #[error("no voting power")]
    NoVotingPower,
    /// The revoke target is not a maintainer.
    #[error("target is not a maintainer")]
    NotAMaintainer,
}

impl ErrorCode for BoardError {
    fn code(&self) -> &'static str {
        match self {
            Self::ZeroAddress => "500",
            Self::InsufficientShares { .. } => "800",
            Self::RateLimited { .. } => "801",
            Self::NotFound(_) => "802",
            Self::AlreadyVoted => "803",
            Self::VotingClosed => "804",
            Self::Expired => "805",
            Self::NotYetExpired { .. } => "806",
            Self::AlreadyClosed => "807",
            Self::NotAccepted => "808",
            Self::AlreadyFulfilled => "809",
            Self::NotMaintainer => "810",
            Self::LastMaintainer => "811",
            Self::NoVotingPower => "812",
            Self::NotAMaintainer => "813",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotMaintainer => ErrorKind::Authorization,
            Self::InsufficientShares { .. } | Self::NoVotingPower => ErrorKind::ResourceExhausted,
            Self::AlreadyVoted | Self::AlreadyClosed | Self::AlreadyFulfilled => {
                ErrorKind::AlreadyFinalized
            }
            Self::ZeroAddress | Self::NotFound(_) | Self::NotAMaintainer => {
                ErrorKind::InvalidInput
            }
            Self::RateLimited { .. }
            | Self::VotingClosed
            | Self::Expired
            | Self::NotYetExpired { .. }
            | Self::NotAccepted
            | Self::LastMaintainer => ErrorKind::StateViolation,
        }
    }
}

/// Errors raised by the link registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// History indexes start at 1.
    #[error("history indexes start at 1")]
    InvalidIndex,
    /// No history entry at the index.
    #[error("history entry {0} not found")]
    NotFound(u64),
}

impl ErrorCode for LinkError {
    fn code(&self) -> &'static str {
        match self {
            Self::InvalidIndex => "901",
            Self::NotFound(_) => "902",
        }
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::InvalidInput
    }
}

/// Errors surfaced by the external token ledger.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The holder's token balance is too small.
    #[error("insufficient token balance: have {have}, need {need}")]
    InsufficientBalance {
        /// Holder balance.
        have: u128,
        /// Requested amount.
        need: u128,
    },
    /// The spender's allowance is too small.
    #[error("insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance {
        /// Approved amount.
        have: u128,
        /// Requested amount.
        need: u128,
    },
}

impl ErrorCode for TokenError {
    fn code(&self) -> &'static str {
        match self {
            Self::InsufficientBalance { .. } => "950",
            Self::InsufficientAllowance { .. } => "951",
        }
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::ResourceExhausted
    }
}

/// Errors related to transaction processing.
#[derive(Error, Debug)]
pub enum TransactionError {
    /// An error occurred during serialization.
    #[error("Serialization error: {0}")]
    Serialization(String),
    /// An error occurred during deserialization.
    #[error("Deserialization error: {0}")]
    Deserialization(String),
    /// The transaction is invalid for a reason without a dedicated variant.
    #[error("Invalid transaction: {0}")]
    Invalid(String),
    /// An error originating from the state backend.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// An error originating from the registry factory.
    #[error("Factory error: {0}")]
    Factory(#[from] FactoryError),
    /// An error originating from a workspace.
    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),
    /// An error originating from a job.
    #[error("Job error: {0}")]
    Job(#[from] JobError),
    /// An error originating from the dividends pool.
    #[error("Dividends error: {0}")]
    Dividends(#[from] DividendsError),
    /// An error originating from the governance board.
    #[error("Board error: {0}")]
    Board(#[from] BoardError),
    /// An error originating from the link registry.
    #[error("Link error: {0}")]
    Link(#[from] LinkError),
    /// An error originating from the token ledger.
    #[error("Token error: {0}")]
    Token(#[from] TokenError),
    /// The account has insufficient native funds.
    #[error("Insufficient funds")]
    InsufficientFunds,
    /// An arithmetic operation overflowed.
    #[error("Balance overflow")]
    BalanceOverflow,
    /// Receive hooks nested too deeply.
    #[error("Call depth exceeded")]
    CallDepthExceeded,
    /// The service or method is not available.
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Serialization(_) => "TX_SERIALIZATION_ERROR",
            Self::Deserialization(_) => "TX_DESERIALIZATION_ERROR",
            Self::Invalid(_) => "TX_INVALID",
            Self::State(e) => e.code(),
            Self::Factory(e) => e.code(),
            Self::Workspace(e) => e.code(),
            Self::Job(e) => e.code(),
            Self::Dividends(e) => e.code(),
            Self::Board(e) => e.code(),
            Self::Link(e) => e.code(),
            Self::Token(e) => e.code(),
            Self::InsufficientFunds => "TX_INSUFFICIENT_FUNDS",
            Self::BalanceOverflow => "TX_BALANCE_OVERFLOW",
            Self::CallDepthExceeded => "TX_CALL_DEPTH_EXCEEDED",
            Self::Unsupported(_) => "TX_UNSUPPORTED",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::State(e) => e.kind(),
            Self::Factory(e) => e.kind(),
            Self::Workspace(e) => e.kind(),
            Self::Job(e) => e.kind(),
            Self::Dividends(e) => e.kind(),
            Self::Board(e) => e.kind(),
            Self::Link(e) => e.kind(),
            Self::Token(e) => e.kind(),
            Self::InsufficientFunds | Self::BalanceOverflow | Self::CallDepthExceeded => {
                ErrorKind::ResourceExhausted
            }
            Self::Serialization(_)
            | Self::Deserialization(_)
            | Self::Invalid(_)
            | Self::Unsupported(_) => ErrorKind::InvalidInput,
        }
    }
}

impl From<String> for TransactionError {
    fn from(s: String) -> Self {
        TransactionError::Invalid(s)
    }
}

impl From<parity_scale_codec::Error> for TransactionError {
    fn from(e: parity_scale_codec::Error) -> Self {
        TransactionError::State(StateError::Decode(e.to_string()))
    }
}
