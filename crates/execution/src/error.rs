// Path: crates/execution/src/error.rs
use dwork_types::error::{ErrorCode, ErrorKind, StateError, TransactionError};
use thiserror::Error;

/// Failures while bringing a machine up.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A genesis write or mint failed.
    #[error("Genesis failed: {0}")]
    Genesis(#[from] TransactionError),
    /// The backend rejected a write.
    #[error("State error: {0}")]
    State(#[from] StateError),
    /// Two services were registered under the same id.
    #[error("Duplicate service id '{0}'")]
    DuplicateService(String),
}

impl ErrorCode for ExecutionError {
    fn code(&self) -> &'static str {
        match self {
            Self::Genesis(e) => e.code(),
            Self::State(e) => e.code(),
            Self::DuplicateService(_) => "EXEC_DUPLICATE_SERVICE",
        }
    }

    fn kind(&self) -> ErrorKind {
        match self {
            Self::Genesis(e) => e.kind(),
            Self::State(e) => e.kind(),
            Self::DuplicateService(_) => ErrorKind::InvalidInput,
        }
    }
}
