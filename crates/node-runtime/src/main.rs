//! # Block Node Runtime
//!
//! Entry point of the block node distribution core.
//!
//! ## Startup Sequence
//!
//! 1. Install logging (`RUST_LOG`, default `info`)
//! 2. Load configuration from `BN_*` environment variables
//! 3. Build the container: ring buffer, persistence and verification
//!    subscribers, block access service
//! 4. Drain acknowledgements and verification results into the log
//! 5. Wait for Ctrl+C, then stop every subscriber

use anyhow::{Context, Result};
use node_runtime::container::{BlockNodeContainer, NodeConfig};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Load configuration from the environment.
fn load_config() -> Result<NodeConfig> {
    let config = NodeConfig::from_env().context("Failed to load configuration")?;
    if let Err(e) = config.validate_for_production() {
        warn!(error = %e, "Running with a non-production configuration");
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .with_thread_names(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = load_config()?;
    let mut container = BlockNodeContainer::new(config)?;

    // Held for the lifetime of the node; the upstream publish transport plugs in here.
    let producer = container.producer()?;

    if let Some(mut acks) = container.acknowledgements() {
        tokio::spawn(async move {
            while let Some(response) = acks.recv().await {
                info!(?response, "Publish stream response");
            }
        });
    }
    if let Some(mut results) = container.verification_results() {
        tokio::spawn(async move {
            while let Some(result) = results.recv().await {
                if result.is_verified() {
                    info!(block = result.block_number, "Block verified");
                } else {
                    warn!(block = result.block_number, status = ?result.status, "Block failed verification");
                }
            }
        });
    }

    info!("Block node is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    info!(published = producer.published(), "Shutdown requested");
    drop(producer);
    tokio::task::spawn_blocking(move || container.shutdown()).await?;
    info!("Block node stopped");

    Ok(())
}
