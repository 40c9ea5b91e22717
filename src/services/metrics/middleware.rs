use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;

use super::MetricsRegistry;

/// Routes served by the application. Anything else is recorded as `unmatched`.
const KNOWN_PATHS: &[&str] = &[
    "/",
    "/health",
    "/metrics",
    "/api/status",
    "/api/start",
    "/api/stop",
    "/api/data",
    "/api/clear",
];

/// Middleware to collect HTTP request metrics
pub async fn metrics_middleware(
    State(metrics): State<Arc<MetricsRegistry>>,
    req: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = normalize_path(req.uri().path());

    let response = next.run(req).await;

    let duration = start.elapsed().as_secs_f64();
    let status = response.status().as_u16().to_string();

    metrics
        .http_requests_total
        .with_label_values(&[&method, path, &status])
        .inc();

    metrics
        .http_request_duration_seconds
        .with_label_values(&[&method, path])
        .observe(duration);

    response
}

/// Normalize path to reduce cardinality
/// Trailing slashes are ignored; unknown paths collapse to a single label
fn normalize_path(path: &str) -> &'static str {
    let trimmed = match path.trim_end_matches('/') {
        "" => "/",
        other => other,
    };

    KNOWN_PATHS
        .iter()
        .find(|known| **known == trimmed)
        .copied()
        .unwrap_or("unmatched")
}
