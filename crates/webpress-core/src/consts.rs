/// Default width of the preview box images are fitted into.
pub const DEFAULT_DISPLAY_MAX_WIDTH: u32 = 800;

/// Default height of the preview box images are fitted into.
pub const DEFAULT_DISPLAY_MAX_HEIGHT: u32 = 600;

/// Delay before re-polling while the server reports `processing`.
pub const DEFAULT_PROCESSING_INTERVAL_MS: u64 = 500;

/// Delay before retrying a failed poll request.
pub const DEFAULT_RETRY_INTERVAL_MS: u64 = 1_000;

/// Multiplier applied to the retry delay after each consecutive failure.
/// 1.0 keeps the delay fixed.
pub const DEFAULT_RETRY_BACKOFF_FACTOR: f64 = 1.0;

/// Ceiling for the retry delay when the backoff factor grows it.
pub const DEFAULT_MAX_RETRY_INTERVAL_MS: u64 = 1_000;

/// Name prefix for jobs missing from the batch's record mapping.
/// Matches the file naming the conversion backend uses for dispatched jobs.
pub const SYNTHESIZED_JOB_NAME_PREFIX: &str = "job-";
