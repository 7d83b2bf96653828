// Performance metrics for campaign computations
//
// Tracks how many pricing runs and supplier reports were computed, how long
// they took, and how many order lines pointed at unknown products.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use utoipa::ToSchema;

/// Threshold above which a computation is logged as slow (100ms)
const SLOW_OPERATION_THRESHOLD_MS: u64 = 100;

/// Shared counters; cloning shares the same underlying values
#[derive(Debug, Clone)]
pub struct PerformanceMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug, Default)]
struct MetricsInner {
    pricing_runs: AtomicU64,
    report_runs: AtomicU64,

    // in microseconds
    total_pricing_time_us: AtomicU64,
    total_report_time_us: AtomicU64,

    slow_pricing_runs: AtomicU64,
    slow_report_runs: AtomicU64,

    failed_runs: AtomicU64,
    unresolved_references: AtomicU64,
}

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner::default()),
        }
    }

    /// Start timing an order pricing run
    pub fn start_pricing(&self) -> OperationTimer {
        OperationTimer::new(OperationType::Pricing, self.clone())
    }

    /// Start timing a supplier report run
    pub fn start_report(&self) -> OperationTimer {
        OperationTimer::new(OperationType::Report, self.clone())
    }

    pub fn record_failure(&self) {
        self.inner.failed_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_unresolved(&self, count: usize) {
        self.inner
            .unresolved_references
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    fn record(&self, operation_type: OperationType, duration: Duration) {
        let (runs, total_us, slow) = match operation_type {
            OperationType::Pricing => (
                &self.inner.pricing_runs,
                &self.inner.total_pricing_time_us,
                &self.inner.slow_pricing_runs,
            ),
            OperationType::Report => (
                &self.inner.report_runs,
                &self.inner.total_report_time_us,
                &self.inner.slow_report_runs,
            ),
        };

        runs.fetch_add(1, Ordering::Relaxed);
        total_us.fetch_add(duration.as_micros() as u64, Ordering::Relaxed);

        if duration.as_millis() as u64 > SLOW_OPERATION_THRESHOLD_MS {
            slow.fetch_add(1, Ordering::Relaxed);
            tracing::warn!("Slow {}: {}ms", operation_type.as_str(), duration.as_millis());
        }
    }

    fn average_ms(count: &AtomicU64, total_us: &AtomicU64) -> f64 {
        let count = count.load(Ordering::Relaxed);
        let total_us = total_us.load(Ordering::Relaxed);

        if count == 0 {
            0.0
        } else {
            (total_us as f64 / count as f64) / 1000.0
        }
    }

    pub fn avg_pricing_time_ms(&self) -> f64 {
        Self::average_ms(&self.inner.pricing_runs, &self.inner.total_pricing_time_us)
    }

    pub fn avg_report_time_ms(&self) -> f64 {
        Self::average_ms(&self.inner.report_runs, &self.inner.total_report_time_us)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            pricing_runs: self.inner.pricing_runs.load(Ordering::Relaxed),
            avg_pricing_time_ms: self.avg_pricing_time_ms(),
            slow_pricing_runs: self.inner.slow_pricing_runs.load(Ordering::Relaxed),
            report_runs: self.inner.report_runs.load(Ordering::Relaxed),
            avg_report_time_ms: self.avg_report_time_ms(),
            slow_report_runs: self.inner.slow_report_runs.load(Ordering::Relaxed),
            failed_runs: self.inner.failed_runs.load(Ordering::Relaxed),
            unresolved_references: self.inner.unresolved_references.load(Ordering::Relaxed),
        }
    }

    pub fn log_summary(&self) {
        let summary = self.summary();
        tracing::info!(
            "Campaign computation metrics:\n\
             Pricing: {} runs, avg {:.2}ms, {} slow\n\
             Supplier report: {} runs, avg {:.2}ms, {} slow\n\
             Failed: {}, unresolved product references: {}",
            summary.pricing_runs,
            summary.avg_pricing_time_ms,
            summary.slow_pricing_runs,
            summary.report_runs,
            summary.avg_report_time_ms,
            summary.slow_report_runs,
            summary.failed_runs,
            summary.unresolved_references,
        );
    }
}

impl Default for PerformanceMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy)]
enum OperationType {
    Pricing,
    Report,
}

impl OperationType {
    fn as_str(&self) -> &'static str {
        match self {
            OperationType::Pricing => "order pricing",
            OperationType::Report => "supplier report",
        }
    }
}

/// Records the elapsed time when dropped
pub struct OperationTimer {
    start: Instant,
    operation_type: OperationType,
    metrics: PerformanceMetrics,
}

impl OperationTimer {
    fn new(operation_type: OperationType, metrics: PerformanceMetrics) -> Self {
        Self {
            start: Instant::now(),
            operation_type,
            metrics,
        }
    }
}

impl Drop for OperationTimer {
    fn drop(&mut self) {
        self.metrics.record(self.operation_type, self.start.elapsed());
    }
}

/// Snapshot of the counters, served at GET /api/metrics
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricsSummary {
    pub pricing_runs: u64,
    pub avg_pricing_time_ms: f64,
    pub slow_pricing_runs: u64,
    pub report_runs: u64,
    pub avg_report_time_ms: f64,
    pub slow_report_runs: u64,
    pub failed_runs: u64,
    pub unresolved_references: u64,
}
