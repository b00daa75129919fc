use std::path::PathBuf;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use webpress_core::config::WebpressConfig;
use webpress_core::error::TransportError;
use webpress_core::jobs::{
    BatchEntry, BatchId, BatchReporter, BatchSpec, JobPollLoop, JobQueue, JobRecord,
    PollResponse, RunOutcome, ThreadSleeper,
};

use crate::summary;

#[derive(Args)]
pub struct PollArgs {
    /// JSON-lines file with one poll response per line
    #[arg(long)]
    pub transcript: PathBuf,

    /// Submitted job as ID=NAME (repeatable)
    #[arg(long = "job", value_parser = parse_job)]
    pub jobs: Vec<JobRecord>,

    /// Only accept results for this batch
    #[arg(long, allow_hyphen_values = true)]
    pub batch_id: Option<BatchId>,

    /// Cancel polling after this many seconds
    #[arg(long, default_value = "30")]
    pub timeout_secs: u64,
}

/// Replays recorded poll responses. Lines that do not parse fail like a bad
/// request; once the transcript runs out every request fails.
pub struct TranscriptQueue {
    lines: std::vec::IntoIter<String>,
}

impl TranscriptQueue {
    pub fn new(contents: &str) -> Self {
        let lines: Vec<String> = contents
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect();
        Self {
            lines: lines.into_iter(),
        }
    }
}

impl JobQueue for TranscriptQueue {
    fn next_result(&mut self) -> Result<PollResponse, TransportError> {
        match self.lines.next() {
            Some(line) => PollResponse::from_json(&line),
            None => Err(TransportError::Request("transcript exhausted".into())),
        }
    }
}

struct ProgressReporter {
    pb: ProgressBar,
}

impl BatchReporter for ProgressReporter {
    fn batch_started(&self, total_jobs: usize) {
        self.pb.set_length(total_jobs as u64);
        self.pb.set_message("waiting");
    }

    fn job_settled(&self, entry: &BatchEntry, settled: usize, _total_jobs: usize) {
        self.pb.set_position(settled as u64);
        self.pb.set_message(entry.original_name.clone());
    }

    fn transport_retry(&self, _error: &TransportError, delay: Duration) {
        self.pb
            .set_message(format!("retrying in {} ms", delay.as_millis()));
    }
}

pub fn run(args: &PollArgs, config: &WebpressConfig) -> Result<()> {
    let contents = std::fs::read_to_string(&args.transcript)
        .with_context(|| format!("Failed to read transcript {}", args.transcript.display()))?;

    let mut poll = JobPollLoop::new(
        TranscriptQueue::new(&contents),
        ThreadSleeper,
        config.polling.clone(),
    );
    poll.start(BatchSpec::new(args.batch_id, args.jobs.clone()));

    // Watchdog: cancels the loop unless polling ends first.
    let token = poll.cancel_token();
    let timeout = Duration::from_secs(args.timeout_secs);
    let (done_tx, done_rx) = mpsc::channel::<()>();
    let watchdog = thread::spawn(move || {
        if let Err(RecvTimeoutError::Timeout) = done_rx.recv_timeout(timeout) {
            tracing::warn!(timeout_secs = timeout.as_secs(), "Poll timeout, cancelling");
            token.cancel();
        }
    });

    let pb = ProgressBar::new(args.jobs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg:24} [{bar:40}] {pos}/{len}")?
            .progress_chars("=> "),
    );
    let reporter = ProgressReporter { pb: pb.clone() };

    let mut delivered = None;
    let outcome = poll.run_reported(&reporter, |result| delivered = Some(result));

    drop(done_tx);
    let _ = watchdog.join();

    match (outcome, delivered) {
        (RunOutcome::Delivered, Some(result)) => {
            pb.finish_with_message("Done");
            summary::print_batch_summary(&result);
        }
        (RunOutcome::Cancelled, _) => {
            pb.abandon_with_message("Cancelled");
            println!("\nPolling cancelled after {} s; no results delivered", args.timeout_secs);
        }
        _ => {
            pb.abandon();
        }
    }

    Ok(())
}

fn parse_job(s: &str) -> Result<JobRecord, String> {
    let (id, name) = s
        .split_once('=')
        .ok_or_else(|| format!("expected ID=NAME, got '{s}'"))?;
    let job_id = id
        .trim()
        .parse()
        .map_err(|_| format!("invalid job id '{id}'"))?;
    Ok(JobRecord::new(job_id, name.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job() {
        assert_eq!(parse_job("4=cat.png"), Ok(JobRecord::new(4, "cat.png")));
        assert!(parse_job("cat.png").is_err());
        assert!(parse_job("x=cat.png").is_err());
        assert_eq!(parse_job("-1=orphan.png"), Ok(JobRecord::new(-1, "orphan.png")));
    }

    #[test]
    fn test_transcript_queue_replays_lines() {
        let mut queue = TranscriptQueue::new(
            "{\"type\": \"processing\"}\n\nnot json\n{\"type\": \"jobs_done\"}\n",
        );
        assert_eq!(queue.next_result().unwrap(), PollResponse::Processing);
        assert!(matches!(
            queue.next_result(),
            Err(TransportError::Malformed(_))
        ));
        assert_eq!(queue.next_result().unwrap(), PollResponse::JobsDone);
        assert!(matches!(
            queue.next_result(),
            Err(TransportError::Request(_))
        ));
    }
}
