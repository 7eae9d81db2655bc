//! Action Scheduler Binary
//!
//! Runs the action scheduler loop against the in-memory task database and host
//! command queue until Ctrl-C.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tracing::info;

use cluster_action_core::config::ConfigManager;
use cluster_action_core::database::InMemoryActionDb;
use cluster_action_core::logging::init_structured_logging;
use cluster_action_core::messaging::InMemoryActionQueue;
use cluster_action_core::orchestration::ActionScheduler;

#[derive(Parser, Debug)]
#[command(name = "action-scheduler")]
#[command(about = "Drive queued cluster actions to completion")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Configuration file (default: layered files under ./config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override scheduler.poll_interval_ms
    #[arg(long)]
    poll_interval_ms: Option<u64>,

    /// Override scheduler.action_timeout_ms
    #[arg(long)]
    action_timeout_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let manager = match &cli.config {
        Some(path) => ConfigManager::load_from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => ConfigManager::load().context("loading configuration")?,
    };

    let mut config = manager.config().clone();
    if let Some(poll_interval_ms) = cli.poll_interval_ms {
        config.scheduler.poll_interval_ms = poll_interval_ms;
    }
    if let Some(action_timeout_ms) = cli.action_timeout_ms {
        config.scheduler.action_timeout_ms = action_timeout_ms;
    }
    config.validate().context("validating configuration")?;

    init_structured_logging(&config.logging);
    info!(environment = %manager.environment(), "Starting action scheduler");

    let db = Arc::new(InMemoryActionDb::new());
    let queue = Arc::new(InMemoryActionQueue::new());
    let scheduler = Arc::new(ActionScheduler::new(&config.scheduler, db, queue)?);
    scheduler.start()?;

    signal::ctrl_c().await?;
    info!("Shutdown signal received");

    scheduler.shutdown().await?;
    info!("Action scheduler stopped");
    Ok(())
}
