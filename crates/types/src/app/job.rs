// Path: crates/types/src/app/job.rs
//! The job escrow record and its assignment state machine.

use crate::app::{AccountId, LibraryRef};
use parity_scale_codec::{Decode, Encode};

/// Dispute sub-state of an assignment.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisputeState {
    /// No dispute was raised.
    #[default]
    None,
    /// The client raised a dispute; the manager has not ruled yet.
    Requested,
    /// The manager ruled for the client. The assignment is closed and refundable.
    ResolvedRefund,
    /// The manager ruled to continue. The assignment resumes where it was.
    ResolvedContinue,
}

/// The status of an assignment, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentStatus {
    /// Added by the client; `ready` says whether a worker may start.
    Created {
        /// Whether the assignment was marked ready.
        ready: bool,
    },
    /// The worker started.
    WorkStarted,
    /// The worker marked the work done.
    WorkDone,
    /// The client accepted the work. Terminal; authorizes one withdrawal.
    Accepted,
    /// A dispute is waiting for the manager.
    DisputeRequested,
    /// The manager ruled for a refund. Terminal.
    Refunded,
}

impl AssignmentStatus {
    /// Terminal statuses allow a new assignment to be added.
    pub fn is_terminal(self) -> bool {
        matches!(self, AssignmentStatus::Accepted | AssignmentStatus::Refunded)
    }
}

/// One unit of work under a job. Only the last assignment is active.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq, Default)]
pub struct Assignment {
    /// Whether the worker may start.
    pub ready: bool,
    /// Whether the worker started.
    pub work_started: bool,
    /// Whether the worker reported completion.
    pub work_done: bool,
    /// Whether the client accepted the work.
    pub accepted: bool,
    /// Dispute sub-state.
    pub dispute: DisputeState,
    /// The worker that started this assignment. Only they can withdraw it.
    pub worker: Option<AccountId>,
    /// Set once the accepted assignment was paid out.
    pub paid: bool,
    /// Worker share paid out under this assignment.
    pub paid_to_worker: u128,
    /// Amount refunded to the client under this assignment.
    pub refunded: u128,
}

impl Assignment {
    /// Creates a fresh assignment.
    pub fn new(ready: bool) -> Self {
        Self {
            ready,
            ..Default::default()
        }
    }

    /// Derives the lifecycle status from the flags.
    ///
    /// A `ResolvedContinue` dispute is transparent: the assignment reports whatever
    /// status its progress flags describe.
    pub fn status(&self) -> AssignmentStatus {
        match self.dispute {
            DisputeState::Requested => return AssignmentStatus::DisputeRequested,
            DisputeState::ResolvedRefund => return AssignmentStatus::Refunded,
            DisputeState::None | DisputeState::ResolvedContinue => {}
        }
        if self.accepted {
            AssignmentStatus::Accepted
        } else if self.work_done {
            AssignmentStatus::WorkDone
        } else if self.work_started {
            AssignmentStatus::WorkStarted
        } else {
            AssignmentStatus::Created { ready: self.ready }
        }
    }
}

/// Coarse job state, combining the kill switch and the active assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    /// No assignment was ever added.
    NoAssignment,
    /// The status of the active (last) assignment.
    Active(AssignmentStatus),
    /// The client cancelled the job.
    Killed,
}

/// Escrow and lifecycle state of one job instance.
#[derive(Encode, Decode, Debug, Clone, PartialEq, Eq)]
pub struct JobRecord {
    /// The job's own address. Native funds are held under it.
    pub address: AccountId,
    /// The workspace that created the job.
    pub workspace: AccountId,
    /// The client funding the job.
    pub client: AccountId,
    /// The manager of the owning workspace.
    pub manager: AccountId,
    /// The currently assigned worker.
    pub worker: Option<AccountId>,
    /// Off-chain description pointer.
    pub metadata_url: String,
    /// Escrowed native balance still owed to somebody.
    pub balance: u128,
    /// Cumulative native amount ever deposited.
    pub total_balance: u128,
    /// Assignment history; the last entry is the active one.
    pub assignments: Vec<Assignment>,
    /// Number of disputes raised over the job's life.
    pub dispute_index: u64,
    /// Set by `kill`; the job accepts nothing afterwards.
    pub killed: bool,
    /// The job template stamp at creation.
    pub library: LibraryRef,
    /// Block height of creation.
    pub created_at: u64,
}

impl JobRecord {
    /// The active assignment, if any.
    pub fn current(&self) -> Option<&Assignment> {
        self.assignments.last()
    }

    /// Mutable access to the active assignment.
    pub fn current_mut(&mut self) -> Option<&mut Assignment> {
        self.assignments.last_mut()
    }

    /// 1-based sequence number of the active assignment, 0 when none.
    pub fn sequence(&self) -> u64 {
        self.assignments.len() as u64
    }

    /// The coarse state of the job.
    pub fn state(&self) -> JobState {
        if self.killed {
            return JobState::Killed;
        }
        match self.current() {
            None => JobState::NoAssignment,
            Some(a) => JobState::Active(a.status()),
        }
    }
}

/// The three-way split of a withdrawn balance.
#[derive(Encode, Decode, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PayoutSplit {
    /// Paid to the worker; absorbs rounding dust.
    pub worker: u128,
    /// Paid to the workspace manager.
    pub manager: u128,
    /// Paid to the dividends pool.
    pub dividends: u128,
}

impl PayoutSplit {
    /// Splits `balance` by the two fee rates. Rounding dust goes to the worker, so the
    /// parts always sum to `balance`.
    pub fn compute(balance: u128, manager_bps: u16, dividends_bps: u16) -> Option<Self> {
        let manager = balance.checked_mul(manager_bps as u128)? / crate::BPS_DENOMINATOR;
        let dividends = balance.checked_mul(dividends_bps as u128)? / crate::BPS_DENOMINATOR;
        let worker = balance.checked_sub(manager)?.checked_sub(dividends)?;
        Some(Self {
            worker,
            manager,
            dividends,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const UNIT: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn split_of_one_unit_at_twenty_and_one_percent() {
        let split = PayoutSplit::compute(UNIT, 2000, 100).unwrap();
        assert_eq!(split.manager, UNIT / 5);
        assert_eq!(split.dividends, UNIT / 100);
        assert_eq!(split.worker, 79 * UNIT / 100);
        assert_eq!(split.worker + split.manager + split.dividends, UNIT);
    }

    #[test]
    fn rounding_dust_goes_to_worker() {
        let split = PayoutSplit::compute(999, 2000, 100).unwrap();
        // 199.8 -> 199, 9.99 -> 9
        assert_eq!(split.manager, 199);
        assert_eq!(split.dividends, 9);
        assert_eq!(split.worker, 791);
    }

    #[test]
    fn status_follows_flags_and_dispute() {
        let mut a = Assignment::new(false);
        assert_eq!(a.status(), AssignmentStatus::Created { ready: false });
        a.ready = true;
        a.work_started = true;
        assert_eq!(a.status(), AssignmentStatus::WorkStarted);
        a.dispute = DisputeState::Requested;
        assert_eq!(a.status(), AssignmentStatus::DisputeRequested);
        a.dispute = DisputeState::ResolvedContinue;
        assert_eq!(a.status(), AssignmentStatus::WorkStarted);
        a.work_done = true;
        assert_eq!(a.status(), AssignmentStatus::WorkDone);
        a.dispute = DisputeState::ResolvedRefund;
        assert_eq!(a.status(), AssignmentStatus::Refunded);
        assert!(a.status().is_terminal());
    }
}
