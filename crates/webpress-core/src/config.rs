use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_DISPLAY_MAX_HEIGHT, DEFAULT_DISPLAY_MAX_WIDTH, DEFAULT_MAX_RETRY_INTERVAL_MS,
    DEFAULT_PROCESSING_INTERVAL_MS, DEFAULT_RETRY_BACKOFF_FACTOR, DEFAULT_RETRY_INTERVAL_MS,
};

/// Top-level configuration, loadable from TOML.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WebpressConfig {
    #[serde(default)]
    pub display: DisplayConfig,
    #[serde(default)]
    pub polling: PollConfig,
}

/// Preview box that loaded images are fitted into.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub max_width: u32,
    pub max_height: u32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_DISPLAY_MAX_WIDTH,
            max_height: DEFAULT_DISPLAY_MAX_HEIGHT,
        }
    }
}

/// Timing of the job poll loop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Wait between polls while the server reports `processing`.
    pub processing_interval_ms: u64,
    /// Wait after a failed poll request.
    pub retry_interval_ms: u64,
    /// Growth of the retry wait per consecutive failure (1.0 = fixed).
    pub retry_backoff_factor: f64,
    /// Upper bound for the grown retry wait.
    pub max_retry_interval_ms: u64,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            processing_interval_ms: DEFAULT_PROCESSING_INTERVAL_MS,
            retry_interval_ms: DEFAULT_RETRY_INTERVAL_MS,
            retry_backoff_factor: DEFAULT_RETRY_BACKOFF_FACTOR,
            max_retry_interval_ms: DEFAULT_MAX_RETRY_INTERVAL_MS,
        }
    }
}

impl PollConfig {
    pub fn processing_interval(&self) -> Duration {
        Duration::from_millis(self.processing_interval_ms)
    }

    pub fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }

    /// Retry delay following `previous`, grown by the backoff factor and
    /// bounded by the ceiling. Never shorter than the base retry interval.
    pub fn next_retry_interval(&self, previous: Duration) -> Duration {
        let base = self.retry_interval();
        if self.retry_backoff_factor <= 1.0 {
            return base;
        }
        let ceiling = Duration::from_millis(self.max_retry_interval_ms).max(base);
        let grown = previous.as_secs_f64() * self.retry_backoff_factor;
        Duration::from_secs_f64(grown.min(ceiling.as_secs_f64())).max(base)
    }
}
