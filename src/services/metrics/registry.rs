use prometheus::{
    CounterVec, Encoder, Gauge, HistogramOpts, HistogramVec, IntCounter, Opts, Registry,
    TextEncoder,
};
use std::sync::Arc;

/// Central metrics registry for the polling service
pub struct MetricsRegistry {
    registry: Registry,

    // HTTP Metrics
    pub http_requests_total: CounterVec,
    pub http_request_duration_seconds: HistogramVec,

    // Fetch Metrics
    pub fetch_total: CounterVec,
    pub fetch_duration_seconds: HistogramVec,

    // Job Metrics
    pub jobs_started_total: IntCounter,
    pub jobs_finished_total: CounterVec,
    pub job_active: Gauge,

    // Store Metrics
    pub stored_responses: Gauge,
}

impl MetricsRegistry {
    pub fn new() -> Result<Arc<Self>, prometheus::Error> {
        let registry = Registry::new();

        // HTTP Metrics
        let http_requests_total = CounterVec::new(
            Opts::new("http_requests_total", "Total HTTP requests").namespace("poller"),
            &["method", "endpoint", "status"],
        )?;
        registry.register(Box::new(http_requests_total.clone()))?;

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new("http_request_duration_seconds", "HTTP request duration")
                .namespace("poller")
                .buckets(vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]),
            &["method", "endpoint"],
        )?;
        registry.register(Box::new(http_request_duration_seconds.clone()))?;

        // Fetch Metrics
        let fetch_total = CounterVec::new(
            Opts::new("fetch_total", "Upstream fetches performed by polling jobs")
                .namespace("poller"),
            &["outcome"],
        )?;
        registry.register(Box::new(fetch_total.clone()))?;

        let fetch_duration_seconds = HistogramVec::new(
            HistogramOpts::new("fetch_duration_seconds", "Upstream fetch duration")
                .namespace("poller")
                .buckets(vec![0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]),
            &["outcome"],
        )?;
        registry.register(Box::new(fetch_duration_seconds.clone()))?;

        // Job Metrics
        let jobs_started_total = IntCounter::with_opts(
            Opts::new("jobs_started_total", "Polling jobs started").namespace("poller"),
        )?;
        registry.register(Box::new(jobs_started_total.clone()))?;

        let jobs_finished_total = CounterVec::new(
            Opts::new("jobs_finished_total", "Polling jobs finished, by reason")
                .namespace("poller"),
            &["reason"],
        )?;
        registry.register(Box::new(jobs_finished_total.clone()))?;

        let job_active = Gauge::with_opts(
            Opts::new("job_active", "1 while a polling job is running").namespace("poller"),
        )?;
        registry.register(Box::new(job_active.clone()))?;

        // Store Metrics
        let stored_responses = Gauge::with_opts(
            Opts::new("stored_responses", "Responses currently held in the store")
                .namespace("poller"),
        )?;
        registry.register(Box::new(stored_responses.clone()))?;

        Ok(Arc::new(Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            fetch_total,
            fetch_duration_seconds,
            jobs_started_total,
            jobs_finished_total,
            job_active,
            stored_responses,
        }))
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> Result<String, Box<dyn std::error::Error>> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }
}
