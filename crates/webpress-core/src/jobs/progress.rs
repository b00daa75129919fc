use std::time::Duration;

use crate::error::TransportError;

use super::batch::BatchEntry;

/// Progress reporting for the poll loop.
///
/// Implementors can use this to drive progress bars, logging, or any other
/// UI feedback. All methods have default no-op implementations.
pub trait BatchReporter {
    /// Polling for a batch of `total_jobs` jobs is about to begin.
    fn batch_started(&self, _total_jobs: usize) {}

    /// A job reached a terminal outcome; `settled` jobs of `total_jobs` are done.
    fn job_settled(&self, _entry: &BatchEntry, _settled: usize, _total_jobs: usize) {}

    /// A poll request failed and will be retried after `delay`.
    fn transport_retry(&self, _error: &TransportError, _delay: Duration) {}
}

/// No-op progress reporter, used when `run` delegates.
pub(super) struct NoOpReporter;
impl BatchReporter for NoOpReporter {}
