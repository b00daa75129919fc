//! Completion tracking for a batch of submitted conversion jobs.
//!
//! [`JobPollLoop`] repeatedly asks a [`JobQueue`] for the next result until
//! every job has completed or failed, or the server declares the batch done.
//! Transport failures are retried indefinitely; only `jobs_done`, the
//! completion count, or cancellation end the loop.

mod batch;
mod poll;
mod progress;
mod protocol;

use serde::{Deserialize, Serialize};

pub use batch::{BatchEntry, BatchResult, JobOutcome};
pub use poll::{
    BatchSpec, CancelToken, Cycle, JobPollLoop, JobQueue, LoopStatus, RunOutcome, Sleeper,
    ThreadSleeper,
};
pub use progress::BatchReporter;
pub use protocol::PollResponse;

/// Server-assigned job identifier. The backend reports `-1` when a worker
/// message carried no id, so ids are signed.
pub type JobId = i64;

/// Server-assigned batch identifier, signed for the same reason as [`JobId`].
pub type BatchId = i64;

/// A submitted job and the name of the file it was created from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub job_id: JobId,
    pub original_name: String,
}

impl JobRecord {
    pub fn new(job_id: JobId, original_name: impl Into<String>) -> Self {
        Self {
            job_id,
            original_name: original_name.into(),
        }
    }
}
