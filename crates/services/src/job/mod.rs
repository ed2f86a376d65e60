// Path: crates/services/src/job/mod.rs
//! Job escrow: the assignment lifecycle, disputes, and payouts.
//!
//! A job's native balance is held at the job's own address in the bank. Deposits arrive
//! as plain transfers and are booked by the receive hook below. Every path that pays out
//! takes the per-job lock and zeroes the booked balance before moving any currency.

use crate::bank;
use crate::factory::FactoryModule;
use crate::sibling;
use crate::workspace::WorkspaceModule;
use dwork_api::services::NativeReceiver;
use dwork_api::state::{read_record, write_record, StateAccess};
use dwork_api::transaction::context::TxContext;
use dwork_macros::service_interface;
use dwork_types::app::{
    AccountId, Assignment, AssignmentStatus, CallerRole, DisputeState, JobRecord, LibraryRef,
    MarketEvent, PayoutSplit,
};
use dwork_types::error::{JobError, StateError, TransactionError};
use dwork_types::keys::{JOB_LOCK_PREFIX, JOB_RECORD_PREFIX};
use dwork_types::service_configs::JobParams;
use parity_scale_codec::{Decode, Encode};

// --- Service Method Parameter Structs ---

/// Sent by the owning workspace right after it mints a job.
#[derive(Encode, Decode, Debug, Clone)]
pub struct InitializeJobParams {
    pub job: AccountId,
    pub workspace: AccountId,
    pub client: AccountId,
    pub manager: AccountId,
    pub metadata_url: String,
    pub library: LibraryRef,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct AssignWorkerParams {
    pub job: AccountId,
    pub worker: AccountId,
}

/// Parameters for calls that only name the job.
#[derive(Encode, Decode, Debug, Clone)]
pub struct JobRef {
    pub job: AccountId,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct AddAssignmentParams {
    pub job: AccountId,
    pub ready: bool,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct ResolveDisputeParams {
    pub job: AccountId,
    pub refund: bool,
}

#[derive(Encode, Decode, Debug, Clone)]
pub struct SetJobMetadataParams {
    pub job: AccountId,
    pub metadata_url: String,
}

// --- Job Module ---

#[derive(Default, Debug)]
pub struct JobModule {
    params: JobParams,
}

impl JobModule {
    pub fn new(params: JobParams) -> Self {
        Self { params }
    }

    fn record_key(job: &AccountId) -> Vec<u8> {
        [JOB_RECORD_PREFIX, job.as_ref()].concat()
    }

    fn lock_key(job: &AccountId) -> Vec<u8> {
        [JOB_LOCK_PREFIX, job.as_ref()].concat()
    }

    fn store(&self, state: &mut dyn StateAccess, record: &JobRecord) -> Result<(), StateError> {
        write_record(state, &Self::record_key(&record.address), record)
    }

    fn acquire(
        &self,
        state: &mut dyn StateAccess,
        job: &AccountId,
    ) -> Result<(), TransactionError> {
        let key = Self::lock_key(job);
        if state.get(&key)?.is_some() {
            return Err(JobError::Reentrancy.into());
        }
        state.insert(&key, &[1])?;
        Ok(())
    }

    fn release(
        &self,
        state: &mut dyn StateAccess,
        job: &AccountId,
    ) -> Result<(), TransactionError> {
        state.delete(&Self::lock_key(job))?;
        Ok(())
    }

    fn load_as_client(
        &self,
        state: &dyn StateAccess,
        job: &AccountId,
        ctx: &TxContext,
    ) -> Result<JobRecord, TransactionError> {
        let record = self.job(state, job)?;
        if record.client != ctx.signer_account_id {
            return Err(JobError::NotClient.into());
        }
        if record.killed {
            return Err(JobError::JobKilled.into());
        }
        Ok(record)
    }

    fn load_as_worker(
        &self,
        state: &dyn StateAccess,
        job: &AccountId,
        ctx: &TxContext,
    ) -> Result<JobRecord, TransactionError> {
        let record = self.job(state, job)?;
        if record.worker != Some(ctx.signer_account_id) {
            return Err(JobError::NotWorker.into());
        }
        if record.killed {
            return Err(JobError::JobKilled.into());
        }
        Ok(record)
    }

    // --- Queries ---

    pub fn job<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
    ) -> Result<JobRecord, TransactionError> {
        read_record(state, &Self::record_key(job))?.ok_or_else(|| JobError::JobNotFound.into())
    }

    /// Escrowed balance not yet paid out.
    pub fn balance<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
    ) -> Result<u128, TransactionError> {
        Ok(self.job(state, job)?.balance)
    }

    /// Everything ever deposited.
    pub fn total_balance<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
    ) -> Result<u128, TransactionError> {
        Ok(self.job(state, job)?.total_balance)
    }

    /// The job template version this job was minted with.
    pub fn version<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
    ) -> Result<u64, TransactionError> {
        Ok(self.job(state, job)?.library.version)
    }

    pub fn worker<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
    ) -> Result<Option<AccountId>, TransactionError> {
        Ok(self.job(state, job)?.worker)
    }

    /// The `sequence`-th (1-based) assignment.
    pub fn assignment<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
        sequence: u64,
    ) -> Result<Assignment, TransactionError> {
        let record = self.job(state, job)?;
        usize::try_from(sequence)
            .ok()
            .and_then(|s| s.checked_sub(1))
            .and_then(|i| record.assignments.get(i))
            .cloned()
            .ok_or_else(|| JobError::NoAssignment.into())
    }

    /// True once the factory's job template moved past the one this job was minted with.
    pub fn is_deprecated<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
        factory: &FactoryModule,
    ) -> Result<bool, TransactionError> {
        Ok(self.version(state, job)? != factory.current_job_library_version(state)?)
    }

    pub fn who_am_i<S: StateAccess + ?Sized>(
        &self,
        state: &S,
        job: &AccountId,
        who: &AccountId,
    ) -> Result<CallerRole, TransactionError> {
        let record = self.job(state, job)?;
        Ok(if record.manager == *who {
            CallerRole::Manager
        } else if record.client == *who {
            CallerRole::Client
        } else if record.worker.as_ref() == Some(who) {
            CallerRole::Worker
        } else {
            CallerRole::Unknown
        })
    }
}

#[service_interface(
    id = "job",
    abi_version = 1,
    state_schema = "v1",
    capabilities = "NATIVE_RECEIVER"
)]
impl JobModule {
    /// One-time setup, accepted only from the owning workspace.
    #[method]
    pub fn initialize(
        &self,
        state: &mut dyn StateAccess,
        params: InitializeJobParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        if ctx.signer_account_id != params.workspace {
            return Err(JobError::NotWorkspace.into());
        }
        if state.get(&Self::record_key(&params.job))?.is_some() {
            return Err(JobError::AlreadyInitialized.into());
        }
        let record = JobRecord {
            address: params.job,
            workspace: params.workspace,
            client: params.client,
            manager: params.manager,
            worker: None,
            metadata_url: params.metadata_url,
            balance: 0,
            total_balance: 0,
            assignments: Vec::new(),
            dispute_index: 0,
            killed: false,
            library: params.library,
            created_at: ctx.block_height,
        };
        Ok(self.store(state, &record)?)
    }

    /// Sets the worker, replacing any previous one. Accepted only from the owning
    /// workspace, which has already checked the worker's registration.
    #[method]
    pub fn assign_worker(
        &self,
        state: &mut dyn StateAccess,
        params: AssignWorkerParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.job(state, &params.job)?;
        if ctx.signer_account_id != record.workspace {
            return Err(JobError::NotWorkspace.into());
        }
        if record.killed {
            return Err(JobError::JobKilled.into());
        }
        if let Some(current) = record.current() {
            let status = current.status();
            if current.work_started && !status.is_terminal() {
                return Err(JobError::WorkAlreadyStarted.into());
            }
            if status == AssignmentStatus::Accepted && !current.paid && record.balance > 0 {
                return Err(JobError::PayoutPending.into());
            }
        }
        if let Some(previous) = record.worker.replace(params.worker) {
            tracing::debug!(target: "job", job = %params.job, %previous, "worker replaced");
        }
        self.store(state, &record)?;
        ctx.emit(MarketEvent::AddedWorker {
            job: params.job,
            worker: params.worker,
        });
        Ok(())
    }

    /// Opens a new assignment once the previous one has finished.
    #[method]
    pub fn add_assignment(
        &self,
        state: &mut dyn StateAccess,
        params: AddAssignmentParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_client(state, &params.job, ctx)?;
        if let Some(current) = record.current() {
            if !current.status().is_terminal() {
                return Err(JobError::PriorAssignmentOpen.into());
            }
        }
        record.assignments.push(Assignment::new(params.ready));
        let sequence = record.sequence();
        self.store(state, &record)?;
        ctx.emit(MarketEvent::AssignmentAdded {
            job: params.job,
            sequence,
            ready: params.ready,
        });
        Ok(())
    }

    #[method]
    pub fn mark_ready(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_client(state, &params.job, ctx)?;
        let sequence = record.sequence();
        let current = record.current_mut().ok_or(JobError::NoAssignment)?;
        match current.status() {
            AssignmentStatus::Created { ready: false } => current.ready = true,
            AssignmentStatus::DisputeRequested => return Err(JobError::DisputeOpen.into()),
            _ => return Err(JobError::AlreadyReady.into()),
        }
        self.store(state, &record)?;
        ctx.emit(MarketEvent::AssignmentReady {
            job: params.job,
            sequence,
        });
        Ok(())
    }

    #[method]
    pub fn start_work(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_worker(state, &params.job, ctx)?;
        let balance = record.balance;
        let sequence = record.sequence();
        let worker = record.worker;
        let current = record.current_mut().ok_or(JobError::NoAssignment)?;
        match current.status() {
            AssignmentStatus::Created { ready: true } => {}
            AssignmentStatus::Created { ready: false } => return Err(JobError::NotReady.into()),
            AssignmentStatus::DisputeRequested => return Err(JobError::DisputeOpen.into()),
            _ => return Err(JobError::WorkAlreadyStarted.into()),
        }
        if balance < self.params.min_start_balance {
            return Err(JobError::InsufficientBalance {
                have: balance,
                need: self.params.min_start_balance,
            }
            .into());
        }
        current.work_started = true;
        current.worker = worker;
        self.store(state, &record)?;
        ctx.emit(MarketEvent::WorkStarted {
            job: params.job,
            sequence,
        });
        Ok(())
    }

    #[method]
    pub fn mark_done(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_worker(state, &params.job, ctx)?;
        let sequence = record.sequence();
        let current = record.current_mut().ok_or(JobError::NoAssignment)?;
        match current.status() {
            AssignmentStatus::WorkStarted => current.work_done = true,
            AssignmentStatus::Created { .. } => return Err(JobError::WorkNotStarted.into()),
            AssignmentStatus::DisputeRequested => return Err(JobError::DisputeOpen.into()),
            _ => return Err(JobError::WorkAlreadyDone.into()),
        }
        self.store(state, &record)?;
        ctx.emit(MarketEvent::WorkDone {
            job: params.job,
            sequence,
        });
        Ok(())
    }

    /// Accepts delivered work. This is the only path that unlocks `withdraw`.
    #[method]
    pub fn mark_accepted(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_client(state, &params.job, ctx)?;
        let sequence = record.sequence();
        let current = record.current_mut().ok_or(JobError::NoAssignment)?;
        match current.status() {
            AssignmentStatus::WorkDone => current.accepted = true,
            AssignmentStatus::DisputeRequested => return Err(JobError::DisputeOpen.into()),
            AssignmentStatus::Accepted => return Err(JobError::AlreadyAccepted.into()),
            _ => return Err(JobError::NotDone.into()),
        }
        self.store(state, &record)?;
        ctx.emit(MarketEvent::AssignmentAccepted {
            job: params.job,
            sequence,
        });
        Ok(())
    }

    #[method]
    pub fn dispute_request(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_client(state, &params.job, ctx)?;
        let current = record.current_mut().ok_or(JobError::NothingToDispute)?;
        match current.status() {
            AssignmentStatus::DisputeRequested => {
                return Err(JobError::DisputeAlreadyOpen.into())
            }
            status if status.is_terminal() => return Err(JobError::NothingToDispute.into()),
            _ => current.dispute = DisputeState::Requested,
        }
        record.dispute_index += 1;
        let dispute_index = record.dispute_index;
        self.store(state, &record)?;
        tracing::info!(target: "job", job = %params.job, dispute_index, "dispute requested");
        ctx.emit(MarketEvent::DisputeRequested {
            job: params.job,
            dispute_index,
        });
        Ok(())
    }

    /// Settles an open dispute. A refund closes the assignment; otherwise the
    /// assignment resumes from where its flags say it was.
    #[method]
    pub fn resolve_dispute(
        &self,
        state: &mut dyn StateAccess,
        params: ResolveDisputeParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.job(state, &params.job)?;
        if record.manager != ctx.signer_account_id {
            return Err(JobError::NotManager.into());
        }
        let current = record.current_mut().ok_or(JobError::NoOpenDispute)?;
        if current.dispute != DisputeState::Requested {
            return Err(JobError::NoOpenDispute.into());
        }
        current.dispute = if params.refund {
            DisputeState::ResolvedRefund
        } else {
            DisputeState::ResolvedContinue
        };
        let dispute_index = record.dispute_index;
        self.store(state, &record)?;
        tracing::info!(
            target: "job",
            job = %params.job,
            dispute_index,
            refund = params.refund,
            "dispute resolved"
        );
        ctx.emit(MarketEvent::DisputeResolved {
            job: params.job,
            dispute_index,
            refund: params.refund,
        });
        Ok(())
    }

    /// Pays out an accepted assignment once: workspace fee to the manager, protocol fee
    /// to the dividends pool, the rest to the worker that did the work.
    #[method]
    pub fn withdraw(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let job = params.job;
        let mut record = self.load_as_worker(state, &job, ctx)?;
        let sequence = record.sequence();
        let current = record.current().ok_or(JobError::NotAccepted)?;
        if current.work_started && current.worker != record.worker {
            return Err(JobError::NotWorker.into());
        }
        if current.status() != AssignmentStatus::Accepted {
            return Err(JobError::NotAccepted.into());
        }
        let amount = record.balance;
        if current.paid || amount == 0 {
            return Err(JobError::NothingToWithdraw.into());
        }

        let workspaces = sibling::<WorkspaceModule>(ctx, "workspace")?;
        let factory = sibling::<FactoryModule>(ctx, "factory")?;
        let manager_bps = workspaces.workspace(state, &record.workspace)?.fee_bps;
        let protocol = factory.protocol_share(state)?;
        let dividends_bps = protocol.map(|(_, bps)| bps).unwrap_or(0);
        let split = PayoutSplit::compute(amount, manager_bps, dividends_bps)
            .ok_or(TransactionError::BalanceOverflow)?;

        self.acquire(state, &job)?;
        record.balance = 0;
        if let Some(current) = record.current_mut() {
            current.paid = true;
            current.paid_to_worker = current.paid_to_worker.saturating_add(split.worker);
        }
        self.store(state, &record)?;

        let worker = ctx.signer_account_id;
        bank::transfer(state, ctx, job, worker, split.worker)?;
        if split.manager > 0 {
            bank::transfer(state, ctx, job, record.manager, split.manager)?;
        }
        if let Some((pool, _)) = protocol.filter(|_| split.dividends > 0) {
            bank::transfer(state, ctx, job, pool, split.dividends)?;
        }
        self.release(state, &job)?;

        tracing::info!(
            target: "job",
            %job,
            worker = split.worker,
            manager = split.manager,
            dividends = split.dividends,
            "withdraw"
        );
        ctx.emit(MarketEvent::Withdraw {
            job,
            sequence,
            worker_amount: split.worker,
            manager_amount: split.manager,
            dividends_amount: split.dividends,
        });
        Ok(())
    }

    /// Returns the escrow to the client after a dispute was resolved with a refund.
    #[method]
    pub fn refund(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let job = params.job;
        let mut record = self.load_as_client(state, &job, ctx)?;
        let sequence = record.sequence();
        let amount = record.balance;
        let current = record.current_mut().ok_or(JobError::NotRefunded)?;
        if current.status() != AssignmentStatus::Refunded {
            return Err(JobError::NotRefunded.into());
        }
        if amount == 0 {
            return Err(JobError::NothingToRefund.into());
        }
        current.refunded = current.refunded.saturating_add(amount);

        self.acquire(state, &job)?;
        record.balance = 0;
        self.store(state, &record)?;
        bank::transfer(state, ctx, job, record.client, amount)?;
        self.release(state, &job)?;

        ctx.emit(MarketEvent::Refund {
            job,
            sequence,
            amount,
        });
        Ok(())
    }

    /// Cancels the job before any work was committed and returns the escrow.
    #[method]
    pub fn kill(
        &self,
        state: &mut dyn StateAccess,
        params: JobRef,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let job = params.job;
        let mut record = self.load_as_client(state, &job, ctx)?;
        // An accepted assignment's balance belongs to the worker until withdrawn.
        let allowed = match record.current() {
            None => true,
            Some(current) => match current.status() {
                AssignmentStatus::Created { ready: false } | AssignmentStatus::Refunded => true,
                AssignmentStatus::Accepted => current.paid || record.balance == 0,
                _ => false,
            },
        };
        if !allowed {
            return Err(JobError::KillNotAllowed.into());
        }

        self.acquire(state, &job)?;
        let refunded = record.balance;
        record.balance = 0;
        record.killed = true;
        self.store(state, &record)?;
        if refunded > 0 {
            bank::transfer(state, ctx, job, record.client, refunded)?;
        }
        self.release(state, &job)?;

        tracing::info!(target: "job", %job, refunded, "job killed");
        ctx.emit(MarketEvent::JobKilled { job, refunded });
        Ok(())
    }

    #[method]
    pub fn set_metadata_url(
        &self,
        state: &mut dyn StateAccess,
        params: SetJobMetadataParams,
        ctx: &mut TxContext,
    ) -> Result<(), TransactionError> {
        let mut record = self.load_as_client(state, &params.job, ctx)?;
        record.metadata_url = params.metadata_url.clone();
        self.store(state, &record)?;
        ctx.emit(MarketEvent::MetadataUrlChange {
            job: params.job,
            metadata_url: params.metadata_url,
        });
        Ok(())
    }
}

impl NativeReceiver for JobModule {
    fn accepts(&self, state: &dyn StateAccess, account: &AccountId) -> Result<bool, StateError> {
        Ok(state.get(&Self::record_key(account))?.is_some())
    }

    fn on_receive(
        &self,
        state: &mut dyn StateAccess,
        ctx: &mut TxContext<'_>,
        from: AccountId,
        to: AccountId,
        amount: u128,
    ) -> Result<(), TransactionError> {
        let mut record = self.job(state, &to)?;
        if record.killed {
            return Err(JobError::JobKilled.into());
        }
        record.balance = record
            .balance
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        record.total_balance = record
            .total_balance
            .checked_add(amount)
            .ok_or(TransactionError::BalanceOverflow)?;
        self.store(state, &record)?;
        ctx.emit(MarketEvent::Deposit {
            job: to,
            from,
            amount,
        });
        Ok(())
    }
}
