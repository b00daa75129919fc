pub mod config;
pub mod crop;
pub mod poll;

use std::path::Path;

use anyhow::{Context, Result};
use webpress_core::config::WebpressConfig;

/// Read `path` as TOML, or fall back to the built-in defaults.
pub fn load_config(path: Option<&Path>) -> Result<WebpressConfig> {
    let Some(path) = path else {
        return Ok(WebpressConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&contents).context("Invalid webpress config")?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}
