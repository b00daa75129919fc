use serde::{Deserialize, Serialize};

use super::{BatchId, JobId};

/// Terminal state of a single job.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobOutcome {
    Completed { urls: Vec<String> },
    Failed { message: String },
}

impl JobOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }
}

/// A job that reached a terminal outcome, with its resolved display name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEntry {
    pub job_id: JobId,
    pub original_name: String,
    pub outcome: JobOutcome,
}

/// Everything a batch produced, delivered once when the batch terminates.
///
/// Entries keep the order in which the server reported them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchResult {
    pub batch_id: Option<BatchId>,
    pub total_jobs: usize,
    pub entries: Vec<BatchEntry>,
    /// Human-readable per-job failures, in report order.
    pub errors: Vec<String>,
}

impl BatchResult {
    /// Jobs that never reported a terminal outcome.
    pub fn pending(&self) -> usize {
        self.total_jobs.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, job_id: JobId) -> Option<&BatchEntry> {
        self.entries.iter().find(|e| e.job_id == job_id)
    }

    pub fn outcome(&self, job_id: JobId) -> Option<&JobOutcome> {
        self.get(job_id).map(|e| &e.outcome)
    }

    /// Completed jobs with their output URLs.
    pub fn completed(&self) -> impl Iterator<Item = (&BatchEntry, &[String])> {
        self.entries.iter().filter_map(|e| match &e.outcome {
            JobOutcome::Completed { urls } => Some((e, urls.as_slice())),
            JobOutcome::Failed { .. } => None,
        })
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.outcome.is_completed()).count()
    }
}
