//! Prometheus metrics for the escrow ledger.
//!
//! All metrics follow the naming convention: `remit_<component>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, HistogramOpts, HistogramVec, IntGauge,
    Opts, Registry, TextEncoder,
};
use std::sync::Arc;

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    /// Deposits accepted
    pub static ref DEPOSITS_ACCEPTED: Counter = Counter::new(
        "remit_ledger_deposits_total",
        "Total number of deposits accepted into escrow"
    ).expect("metric creation failed");

    /// Payments released to their intermediary
    pub static ref PAYMENTS_CLAIMED: Counter = Counter::new(
        "remit_ledger_claims_total",
        "Total number of payments claimed by intermediaries"
    ).expect("metric creation failed");

    /// Payments returned to their payer
    pub static ref PAYMENTS_REFUNDED: Counter = Counter::new(
        "remit_ledger_refunds_total",
        "Total number of payments refunded to payers"
    ).expect("metric creation failed");

    /// Payments currently held in escrow
    pub static ref PAYMENTS_PENDING: IntGauge = IntGauge::new(
        "remit_ledger_payments_pending",
        "Number of payments awaiting claim or refund"
    ).expect("metric creation failed");

    /// Value moved out of escrow, by path (claim/refund)
    pub static ref VALUE_RELEASED: CounterVec = CounterVec::new(
        Opts::new("remit_treasury_value_released_total", "Value released from escrow"),
        &["path"]
    ).expect("metric creation failed");

    /// Rejected operations by operation and reason code
    pub static ref OPERATIONS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("remit_ledger_rejections_total", "Rejected operations by reason"),
        &["operation", "reason"]
    ).expect("metric creation failed");

    /// Operation latency
    pub static ref OPERATION_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "remit_ledger_operation_duration_seconds",
            "Time spent executing ledger operations"
        ).buckets(exponential_buckets(0.00001, 2.0, 16).expect("valid buckets")),
        &["operation"]
    ).expect("metric creation failed");
}

/// Handle for the registered metrics.
pub struct MetricsHandle {
    registry: Arc<Registry>,
}

impl MetricsHandle {
    /// Number of metric families currently exposed.
    pub fn family_count(&self) -> usize {
        self.registry.gather().len()
    }
}

/// Register all metrics with the global registry.
///
/// Safe to call more than once; metrics already registered are skipped.
pub fn register_metrics() -> Result<MetricsHandle, TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        Box::new(DEPOSITS_ACCEPTED.clone()),
        Box::new(PAYMENTS_CLAIMED.clone()),
        Box::new(PAYMENTS_REFUNDED.clone()),
        Box::new(PAYMENTS_PENDING.clone()),
        Box::new(VALUE_RELEASED.clone()),
        Box::new(OPERATIONS_REJECTED.clone()),
        Box::new(OPERATION_DURATION.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }

    Ok(MetricsHandle {
        registry: Arc::new(REGISTRY.clone()),
    })
}

/// Encode all metrics as Prometheus text format.
pub fn encode_metrics() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}

/// Count a rejected operation.
pub fn record_rejection(operation: &str, reason: &str) {
    OPERATIONS_REJECTED
        .with_label_values(&[operation, reason])
        .inc();
}

/// Timer guard for automatic histogram observation.
pub struct OperationTimer {
    operation: &'static str,
    start: std::time::Instant,
}

impl OperationTimer {
    /// Start a new timer for the given operation.
    pub fn start(operation: &'static str) -> Self {
        Self {
            operation,
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        let duration = self.start.elapsed().as_secs_f64();
        OPERATION_DURATION
            .with_label_values(&[self.operation])
            .observe(duration);
    }
}
