//! # Dealer-Ledger Peer
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logging + metrics)
//! 2. Load configuration (file, then `DL_*` environment overrides)
//! 3. Start the node runtime
//! 4. Run until Ctrl+C, then shut down gracefully and log final metrics

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use ledger_telemetry::{encode_metrics, init_telemetry, TelemetryConfig};
use node_runtime::{NodeConfig, NodeRuntime};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "dl-peer", about = "Dealer-Ledger peer hosting the account contract")]
struct Cli {
    /// TOML configuration file; defaults apply when omitted
    #[arg(short, long, env = "DL_CONFIG")]
    config: Option<PathBuf>,
}

fn load_config(path: Option<&PathBuf>) -> Result<NodeConfig> {
    let mut config = match path {
        Some(path) => NodeConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => NodeConfig::default(),
    };
    config
        .apply_env_overrides()
        .context("applying environment overrides")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_telemetry(&TelemetryConfig::for_service("dl-peer")).context("initializing telemetry")?;

    let config = load_config(cli.config.as_ref())?;
    let runtime = NodeRuntime::start(config)
        .await
        .context("starting peer")?;

    info!(addr = %runtime.local_addr(), "Peer is running. Press Ctrl+C to stop.");
    tokio::signal::ctrl_c().await?;

    runtime.shutdown().await;
    match encode_metrics() {
        Ok(snapshot) => info!("Final metrics:\n{snapshot}"),
        Err(e) => warn!(error = %e, "Could not encode metrics"),
    }
    Ok(())
}
