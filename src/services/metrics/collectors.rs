use std::sync::Arc;
use std::time::Instant;

use super::MetricsRegistry;

/// Outcome label for a single upstream fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Success,
    Failure,
}

impl FetchOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
        }
    }
}

/// Collector for polling job metrics
#[derive(Clone)]
pub struct PollingMetricsCollector {
    metrics: Arc<MetricsRegistry>,
}

impl PollingMetricsCollector {
    pub fn new(metrics: Arc<MetricsRegistry>) -> Self {
        Self { metrics }
    }

    pub fn record_job_started(&self) {
        self.metrics.jobs_started_total.inc();
        self.metrics.job_active.set(1.0);
    }

    pub fn record_job_finished(&self, reason: &str) {
        self.metrics
            .jobs_finished_total
            .with_label_values(&[reason])
            .inc();
        self.metrics.job_active.set(0.0);
    }

    pub fn record_fetch(&self, outcome: FetchOutcome, duration_secs: f64) {
        self.metrics
            .fetch_total
            .with_label_values(&[outcome.as_label()])
            .inc();

        self.metrics
            .fetch_duration_seconds
            .with_label_values(&[outcome.as_label()])
            .observe(duration_secs);
    }

    pub fn set_stored_responses(&self, count: usize) {
        self.metrics.stored_responses.set(count as f64);
    }
}

/// Timer helper for measuring durations
pub struct MetricsTimer {
    start: Instant,
}

impl MetricsTimer {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

impl Default for MetricsTimer {
    fn default() -> Self {
        Self::new()
    }
}
