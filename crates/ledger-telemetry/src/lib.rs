//! # Ledger Telemetry
//!
//! Structured logging (`tracing`) and Prometheus metrics for Dealer-Ledger
//! processes.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ledger_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_telemetry(&TelemetryConfig::for_service("dl-peer"))?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `DL_SERVICE_NAME` | `dealer-ledger` | Service name in logs |
//! | `DL_LOG_LEVEL` | `info` | Log level filter (`RUST_LOG` also honored) |
//! | `DL_JSON_LOGS` | `false` | JSON log lines |
//! | `DL_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    encode_metrics, register_metrics, HistogramTimer, COMMIT_CONFLICTS, CONTRACT_FAILURES,
    PROPOSALS_RECEIVED, PROPOSALS_REJECTED, PROPOSAL_DURATION, TRANSACTIONS_COMMITTED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Register metrics and install the global log subscriber.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    register_metrics()?;
    init_logging(config)
}
