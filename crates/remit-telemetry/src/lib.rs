//! # Remit Telemetry
//!
//! Observability for the Remit escrow ledger.
//!
//! ## Components
//!
//! - **Logging**: `tracing-subscriber` registry, pretty or JSON output
//! - **Metrics**: Prometheus counters, gauges and histograms
//!
//! ## Usage
//!
//! ```rust,ignore
//! use remit_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     let _guard = init_telemetry(config).expect("Failed to init telemetry");
//!
//!     // Ledger operations now log and record metrics
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `REMIT_SERVICE_NAME` | `remit` | Service name in logs |
//! | `REMIT_LOG_LEVEL` | `info` | Log level filter |
//! | `REMIT_JSON_LOGS` | `false` | JSON log lines |
//! | `REMIT_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `REMIT_NETWORK` | `devnet` | Network name |

#![warn(missing_docs)]

mod config;
mod logging;
pub mod metrics;

pub use config::{parse_flag, TelemetryConfig};
pub use logging::{build_filter, init_logging, LoggingGuard};
pub use metrics::{
    encode_metrics, record_rejection, register_metrics, MetricsHandle, OperationTimer,
    DEPOSITS_ACCEPTED, OPERATIONS_REJECTED, OPERATION_DURATION, PAYMENTS_CLAIMED,
    PAYMENTS_PENDING, PAYMENTS_REFUNDED, VALUE_RELEASED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The subscriber could not be installed.
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    /// Metrics could not be registered or encoded.
    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),
}

/// Initialize logging and metrics.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let metrics = register_metrics()?;
    let logging = init_logging(&config)?;

    Ok(TelemetryGuard {
        _logging: logging,
        _metrics: metrics,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _logging: LoggingGuard,
    _metrics: MetricsHandle,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!("Shutting down telemetry...");
    }
}
