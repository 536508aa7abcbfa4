//! Prometheus metrics for the peer.
//!
//! All metrics follow the naming convention: `dl_<area>_<metric>_<unit>`

use lazy_static::lazy_static;
use prometheus::{
    exponential_buckets, Counter, CounterVec, Encoder, Histogram, HistogramOpts, HistogramVec,
    Opts, Registry, TextEncoder,
};

use crate::TelemetryError;

lazy_static! {
    /// Global metrics registry
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // PROPOSAL METRICS
    // =========================================================================

    /// Proposals received, by request kind
    pub static ref PROPOSALS_RECEIVED: CounterVec = CounterVec::new(
        Opts::new("dl_peer_proposals_received_total", "Proposals received by the peer"),
        &["kind"]  // kind: evaluate/submit
    ).expect("metric creation failed");

    /// Proposals refused before execution
    pub static ref PROPOSALS_REJECTED: CounterVec = CounterVec::new(
        Opts::new("dl_peer_proposals_rejected_total", "Proposals refused before execution"),
        &["reason"]  // reason: bad_request/unauthorized/unknown_target
    ).expect("metric creation failed");

    /// Proposal handling duration
    pub static ref PROPOSAL_DURATION: HistogramVec = HistogramVec::new(
        HistogramOpts::new(
            "dl_peer_proposal_duration_seconds",
            "Time from request decode to response"
        ).buckets(exponential_buckets(0.0001, 2.0, 16).expect("valid buckets")),
        &["kind"]
    ).expect("metric creation failed");

    // =========================================================================
    // COMMIT METRICS
    // =========================================================================

    /// Transactions committed to world state
    pub static ref TRANSACTIONS_COMMITTED: Counter = Counter::new(
        "dl_commit_transactions_committed_total",
        "Transactions committed to world state"
    ).expect("metric creation failed");

    /// MVCC read conflicts at commit
    pub static ref COMMIT_CONFLICTS: Counter = Counter::new(
        "dl_commit_conflicts_total",
        "Transactions invalidated by a read conflict"
    ).expect("metric creation failed");

    /// Contract invocations that returned a business-rule error
    pub static ref CONTRACT_FAILURES: CounterVec = CounterVec::new(
        Opts::new("dl_contract_failures_total", "Contract invocations that failed"),
        &["function"]
    ).expect("metric creation failed");
}

/// Register all metrics with the global registry. Safe to call more than once.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Proposals
        Box::new(PROPOSALS_RECEIVED.clone()),
        Box::new(PROPOSALS_REJECTED.clone()),
        Box::new(PROPOSAL_DURATION.clone()),
        // Commit
        Box::new(TRANSACTIONS_COMMITTED.clone()),
        Box::new(COMMIT_CONFLICTS.clone()),
        // Contract
        Box::new(CONTRACT_FAILURES.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
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

/// Timer guard for automatic histogram observation.
pub struct HistogramTimer {
    histogram: Histogram,
    start: std::time::Instant,
}

impl HistogramTimer {
    /// Start a new timer for the given histogram.
    pub fn new(histogram: &Histogram) -> Self {
        Self {
            histogram: histogram.clone(),
            start: std::time::Instant::now(),
        }
    }
}

impl Drop for HistogramTimer {
    fn drop(&mut self) {
        self.histogram.observe(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_twice() {
        register_metrics().unwrap();
        register_metrics().unwrap();
    }

    #[test]
    fn test_encode_includes_counters() {
        register_metrics().unwrap();
        PROPOSALS_RECEIVED.with_label_values(&["submit"]).inc();
        TRANSACTIONS_COMMITTED.inc();

        let text = encode_metrics().unwrap();
        assert!(text.contains("dl_peer_proposals_received_total"));
        assert!(text.contains("dl_commit_transactions_committed_total"));
    }

    #[test]
    fn test_histogram_timer() {
        let histogram = PROPOSAL_DURATION.with_label_values(&["evaluate"]);
        let before = histogram.get_sample_count();
        drop(HistogramTimer::new(&histogram));
        assert_eq!(histogram.get_sample_count(), before + 1);
    }
}
