#![allow(dead_code)]

use std::collections::VecDeque;
use std::time::Duration;

use webpress_core::error::TransportError;
use webpress_core::jobs::{CancelToken, JobQueue, JobRecord, PollResponse, Sleeper};

/// Job queue that replays a fixed script of responses.
///
/// Once the script runs out every request fails, like an unreachable server.
#[derive(Default)]
pub struct ScriptedQueue {
    script: VecDeque<Result<PollResponse, TransportError>>,
    pub calls: usize,
    /// Cancel this token while the given (1-based) request is in flight.
    cancel_during: Option<(usize, CancelToken)>,
}

impl ScriptedQueue {
    pub fn new(script: Vec<Result<PollResponse, TransportError>>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    pub fn ok(responses: Vec<PollResponse>) -> Self {
        Self::new(responses.into_iter().map(Ok).collect())
    }

    pub fn cancel_during(&mut self, call: usize, token: CancelToken) {
        self.cancel_during = Some((call, token));
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl JobQueue for ScriptedQueue {
    fn next_result(&mut self) -> Result<PollResponse, TransportError> {
        self.calls += 1;
        if let Some((call, token)) = &self.cancel_during {
            if *call == self.calls {
                token.cancel();
            }
        }
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("script exhausted".into())))
    }
}

/// Sleeper that records requested waits instead of blocking.
#[derive(Default)]
pub struct RecordingSleeper {
    pub sleeps: Vec<Duration>,
}

impl Sleeper for RecordingSleeper {
    fn sleep(&mut self, duration: Duration) {
        self.sleeps.push(duration);
    }
}

/// Sleeper that cancels the loop while it is suspended.
pub struct CancellingSleeper {
    pub token: CancelToken,
    pub sleeps: usize,
}

impl Sleeper for CancellingSleeper {
    fn sleep(&mut self, _duration: Duration) {
        self.sleeps += 1;
        self.token.cancel();
    }
}

pub fn completed(batch_id: i64, job_id: i64, urls: &[&str]) -> PollResponse {
    PollResponse::Completed {
        batch_id,
        job_id,
        urls: urls.iter().map(|u| u.to_string()).collect(),
    }
}

pub fn job_error(batch_id: i64, job_id: i64, error: &str) -> PollResponse {
    PollResponse::JobError {
        batch_id,
        job_id,
        error: Some(error.to_string()),
        traceback: None,
    }
}

pub fn transport_failure() -> Result<PollResponse, TransportError> {
    Err(TransportError::Request("connection refused".into()))
}

/// Records `job_id -> "image-<id>.png"` for each id.
pub fn records(ids: &[i64]) -> Vec<JobRecord> {
    ids.iter()
        .map(|&id| JobRecord::new(id, format!("image-{id}.png")))
        .collect()
}
