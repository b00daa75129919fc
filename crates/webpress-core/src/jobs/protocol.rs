use serde::{Deserialize, Serialize};

use crate::error::TransportError;

use super::{BatchId, JobId};

/// One response from the job queue's poll endpoint, tagged by `type`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PollResponse {
    /// Jobs are still running; nothing new to report.
    Processing,
    /// The server will report nothing further for this batch.
    JobsDone,
    /// A job finished and produced output files.
    #[serde(rename = "images")]
    Completed {
        batch_id: BatchId,
        job_id: JobId,
        #[serde(default)]
        urls: Vec<String>,
    },
    /// A job failed. `traceback` is diagnostic only.
    JobError {
        batch_id: BatchId,
        job_id: JobId,
        #[serde(default)]
        error: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        traceback: Option<String>,
    },
}

impl PollResponse {
    pub fn from_json(body: &str) -> Result<Self, TransportError> {
        Ok(serde_json::from_str(body)?)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::JobsDone => "jobs_done",
            Self::Completed { .. } => "images",
            Self::JobError { .. } => "job_error",
        }
    }
}
