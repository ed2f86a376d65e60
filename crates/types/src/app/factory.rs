// Path: crates/types/src/app/factory.rs
//! Records owned by the registry factory.

use crate::app::AccountId;
use parity_scale_codec::{Decode, Encode};

/// A reference to an implementation template together with its version stamp.
///
/// The version is bumped every time the template address is swapped. Instances keep
/// the reference they were created with; comparing it to the factory's live reference
/// tells whether the instance is deprecated.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryRef {
    /// Identifier of the implementation template.
    pub address: AccountId,
    /// Monotonic version counter, starting at 1 for the first template.
    pub version: u64,
}

/// Global factory settings.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct FactoryState {
    /// Account allowed to swap templates, toggle the factory, and wire collaborators.
    pub owner: AccountId,
    /// Governance board allowed to change the protocol fee.
    pub board: Option<AccountId>,
    /// Dividends pool receiving the protocol share of every job payout.
    pub dividends: Option<AccountId>,
    /// Protocol fee in basis points.
    pub contract_fee_bps: u16,
    /// When true, `create_workspace` is rejected.
    pub disabled: bool,
    /// Current workspace implementation template.
    pub workspace_library: Option<LibraryRef>,
    /// Current job implementation template.
    pub job_library: Option<LibraryRef>,
    /// Total workspaces ever created.
    pub workspace_count: u64,
}

impl FactoryState {
    /// Live workspace template version, or 0 before any template is set.
    pub fn workspace_version(&self) -> u64 {
        self.workspace_library.map(|l| l.version).unwrap_or(0)
    }

    /// Live job template version, or 0 before any template is set.
    pub fn job_version(&self) -> u64 {
        self.job_library.map(|l| l.version).unwrap_or(0)
    }
}

/// Per-manager deployment history. Append-only.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceRecord {
    /// The manager owning every workspace in `history`.
    pub manager: AccountId,
    /// Workspace addresses in creation order. Index `i` (1-based) is `history[i - 1]`.
    pub history: Vec<AccountId>,
}

impl WorkspaceRecord {
    /// The 1-based index of the live workspace. Zero when the history is empty.
    pub fn current_index(&self) -> u64 {
        self.history.len() as u64
    }

    /// The workspace at a 1-based history index.
    pub fn at(&self, index: u64) -> Option<AccountId> {
        let idx = usize::try_from(index).ok()?.checked_sub(1)?;
        self.history.get(idx).copied()
    }

    /// The live, non-deprecated workspace for this manager.
    pub fn current(&self) -> Option<AccountId> {
        self.history.last().copied()
    }
}
