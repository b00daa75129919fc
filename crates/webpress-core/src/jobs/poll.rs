use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::config::PollConfig;
use crate::consts::SYNTHESIZED_JOB_NAME_PREFIX;
use crate::error::TransportError;

use super::batch::{BatchEntry, BatchResult, JobOutcome};
use super::progress::{BatchReporter, NoOpReporter};
use super::protocol::PollResponse;
use super::{BatchId, JobId, JobRecord};

/// The polled endpoint of the job queue. Each call is one request.
pub trait JobQueue {
    fn next_result(&mut self) -> Result<PollResponse, TransportError>;
}

impl<Q: JobQueue + ?Sized> JobQueue for Box<Q> {
    fn next_result(&mut self) -> Result<PollResponse, TransportError> {
        (**self).next_result()
    }
}

/// Waits between poll cycles.
pub trait Sleeper {
    fn sleep(&mut self, duration: Duration);
}

/// Blocks the current thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Shared stop flag for a poll loop. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// The jobs making up one batch.
#[derive(Clone, Debug, Default)]
pub struct BatchSpec {
    /// When set, results tagged with a different batch are ignored.
    pub batch_id: Option<BatchId>,
    pub jobs: Vec<JobRecord>,
}

impl BatchSpec {
    pub fn new(batch_id: Option<BatchId>, jobs: Vec<JobRecord>) -> Self {
        Self { batch_id, jobs }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopStatus {
    /// No batch has been started.
    Idle,
    Running,
    /// The batch result has been handed out.
    Terminated,
    Cancelled,
}

/// Result of a single poll cycle.
#[derive(Clone, Debug, PartialEq)]
pub enum Cycle {
    /// Keep polling.
    Pending,
    /// The batch terminated; this is its only delivery.
    Finished(BatchResult),
    /// The loop was cancelled; nothing will be delivered.
    Cancelled,
    /// No batch is running, so no request was made.
    Inactive,
}

/// How [`JobPollLoop::run`] ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    Delivered,
    Cancelled,
    NotStarted,
}

/// Accumulator owned by the loop for the lifetime of one batch.
struct BatchState {
    batch_id: Option<BatchId>,
    names: HashMap<JobId, String>,
    total_jobs: usize,
    entries: Vec<BatchEntry>,
    settled: HashSet<JobId>,
    errors: Vec<String>,
    retry_delay: Duration,
}

impl BatchState {
    fn new(spec: BatchSpec, retry_delay: Duration) -> Self {
        let names: HashMap<JobId, String> = spec
            .jobs
            .into_iter()
            .map(|r| (r.job_id, r.original_name))
            .collect();
        let total_jobs = names.len();
        Self {
            batch_id: spec.batch_id,
            names,
            total_jobs,
            entries: Vec::with_capacity(total_jobs),
            settled: HashSet::with_capacity(total_jobs),
            errors: Vec::new(),
            retry_delay,
        }
    }

    fn name_of(&self, job_id: JobId) -> String {
        self.names
            .get(&job_id)
            .cloned()
            .unwrap_or_else(|| format!("{SYNTHESIZED_JOB_NAME_PREFIX}{job_id}"))
    }

    fn is_complete(&self) -> bool {
        self.entries.len() >= self.total_jobs
    }

    fn into_result(self) -> BatchResult {
        BatchResult {
            batch_id: self.batch_id,
            total_jobs: self.total_jobs,
            entries: self.entries,
            errors: self.errors,
        }
    }
}

/// Polls a [`JobQueue`] until a batch completes.
///
/// The loop is single-flight: one request at a time, with a sleep after
/// `processing` responses and after failed requests. The cancel flag is
/// checked before every request and after every suspension; once it is set
/// no further requests are issued, any response in hand is discarded and the
/// batch result is never delivered.
pub struct JobPollLoop<Q, S = ThreadSleeper> {
    queue: Q,
    sleeper: S,
    config: PollConfig,
    cancel: CancelToken,
    status: LoopStatus,
    batch: Option<BatchState>,
}

impl<Q: JobQueue, S: Sleeper> JobPollLoop<Q, S> {
    pub fn new(queue: Q, sleeper: S, config: PollConfig) -> Self {
        Self {
            queue,
            sleeper,
            config,
            cancel: CancelToken::new(),
            status: LoopStatus::Idle,
            batch: None,
        }
    }

    /// Use a caller-owned cancel token instead of a fresh one.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the loop when cancelled. Stays valid across batches.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn status(&self) -> LoopStatus {
        self.status
    }

    pub fn config(&self) -> &PollConfig {
        &self.config
    }

    pub fn queue(&self) -> &Q {
        &self.queue
    }

    pub fn queue_mut(&mut self) -> &mut Q {
        &mut self.queue
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Jobs that have reached a terminal outcome in the running batch.
    pub fn settled(&self) -> usize {
        self.batch.as_ref().map_or(0, |b| b.entries.len())
    }

    /// Begin tracking a new batch. Any previous batch state, error log and
    /// cancellation are discarded.
    pub fn start(&mut self, spec: BatchSpec) {
        self.cancel.reset();
        info!(
            batch_id = ?spec.batch_id,
            jobs = spec.jobs.len(),
            "Polling started"
        );
        self.batch = Some(BatchState::new(spec, self.config.retry_interval()));
        self.status = LoopStatus::Running;
    }

    pub fn step(&mut self) -> Cycle {
        self.step_reported(&NoOpReporter)
    }

    /// Run one poll cycle: at most one request plus its follow-up sleep.
    pub fn step_reported(&mut self, reporter: &dyn BatchReporter) -> Cycle {
        if self.status != LoopStatus::Running {
            return Cycle::Inactive;
        }
        if self.cancel.is_cancelled() {
            return self.mark_cancelled();
        }
        if self.batch.as_ref().is_some_and(|b| b.total_jobs == 0) {
            return self.finish();
        }

        let response = self.queue.next_result();
        if self.cancel.is_cancelled() {
            return self.mark_cancelled();
        }

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                let Some(batch) = self.batch.as_mut() else {
                    return Cycle::Inactive;
                };
                let delay = batch.retry_delay;
                batch.retry_delay = self.config.next_retry_interval(delay);
                warn!(error = %e, delay_ms = delay.as_millis() as u64, "Poll request failed, retrying");
                reporter.transport_retry(&e, delay);
                self.sleeper.sleep(delay);
                return self.after_suspension();
            }
        };

        if let Some(batch) = self.batch.as_mut() {
            batch.retry_delay = self.config.retry_interval();
        }
        debug!(kind = response.kind(), "Poll response");

        match response {
            PollResponse::Processing => {
                self.sleeper.sleep(self.config.processing_interval());
                self.after_suspension()
            }
            PollResponse::JobsDone => self.finish(),
            PollResponse::Completed {
                batch_id,
                job_id,
                urls,
            } => self.settle(batch_id, job_id, JobOutcome::Completed { urls }, reporter),
            PollResponse::JobError {
                batch_id,
                job_id,
                error,
                traceback,
            } => {
                if let Some(tb) = traceback.as_deref() {
                    debug!(job_id, traceback = tb, "Job traceback");
                }
                let message = error.unwrap_or_else(|| "unknown error".to_string());
                self.settle(batch_id, job_id, JobOutcome::Failed { message }, reporter)
            }
        }
    }

    pub fn run(&mut self, on_complete: impl FnOnce(BatchResult)) -> RunOutcome {
        self.run_reported(&NoOpReporter, on_complete)
    }

    /// Poll until the batch terminates or is cancelled. `on_complete` is
    /// called at most once, only when the batch terminates.
    pub fn run_reported(
        &mut self,
        reporter: &dyn BatchReporter,
        on_complete: impl FnOnce(BatchResult),
    ) -> RunOutcome {
        let Some(batch) = self.batch.as_ref().filter(|_| self.status == LoopStatus::Running) else {
            return RunOutcome::NotStarted;
        };
        reporter.batch_started(batch.total_jobs);

        loop {
            match self.step_reported(reporter) {
                Cycle::Pending => continue,
                Cycle::Finished(result) => {
                    on_complete(result);
                    return RunOutcome::Delivered;
                }
                Cycle::Cancelled => return RunOutcome::Cancelled,
                Cycle::Inactive => return RunOutcome::NotStarted,
            }
        }
    }

    fn settle(
        &mut self,
        batch_id: BatchId,
        job_id: JobId,
        outcome: JobOutcome,
        reporter: &dyn BatchReporter,
    ) -> Cycle {
        let Some(batch) = self.batch.as_mut() else {
            return Cycle::Inactive;
        };

        if batch.batch_id.is_some_and(|current| current != batch_id) {
            debug!(batch_id, job_id, "Ignoring result for another batch");
            return Cycle::Pending;
        }
        if batch.settled.contains(&job_id) {
            debug!(job_id, "Ignoring repeated result for settled job");
            return Cycle::Pending;
        }

        let original_name = batch.name_of(job_id);
        if let JobOutcome::Failed { message } = &outcome {
            warn!(job_id, name = %original_name, error = %message, "Job failed");
            batch.errors.push(format!("{original_name}: {message}"));
        }

        batch.settled.insert(job_id);
        batch.entries.push(BatchEntry {
            job_id,
            original_name,
            outcome,
        });

        let settled = batch.entries.len();
        if let Some(entry) = batch.entries.last() {
            reporter.job_settled(entry, settled, batch.total_jobs);
        }

        if batch.is_complete() {
            self.finish()
        } else {
            Cycle::Pending
        }
    }

    fn after_suspension(&mut self) -> Cycle {
        if self.cancel.is_cancelled() {
            self.mark_cancelled()
        } else {
            Cycle::Pending
        }
    }

    fn finish(&mut self) -> Cycle {
        self.status = LoopStatus::Terminated;
        let Some(batch) = self.batch.take() else {
            return Cycle::Inactive;
        };
        let result = batch.into_result();
        info!(
            batch_id = ?result.batch_id,
            completed = result.len() - result.failed_count(),
            failed = result.failed_count(),
            pending = result.pending(),
            "Batch finished"
        );
        Cycle::Finished(result)
    }

    fn mark_cancelled(&mut self) -> Cycle {
        if self.batch.take().is_some() {
            info!("Polling cancelled");
        }
        self.status = LoopStatus::Cancelled;
        Cycle::Cancelled
    }
}
