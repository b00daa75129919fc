mod commands;
mod summary;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "webpress", about = "Crop geometry and conversion job tracking for WebP batches")]
#[command(version)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply crop edits to an image and print the resulting selection
    Crop(commands::crop::CropArgs),
    /// Replay a poll transcript through the job poll loop
    Poll(commands::poll::PollArgs),
    /// Print or save the default config as TOML
    Config(commands::config::ConfigArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = commands::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Crop(args) => commands::crop::run(args, &config),
        Commands::Poll(args) => commands::poll::run(args, &config),
        Commands::Config(args) => commands::config::run(args),
    }
}
