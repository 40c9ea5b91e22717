use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::TestContext;

// =============================================================================
// INTEGRATION TESTS - STATUS AND STOP (GET /api/status, POST /api/stop)
// =============================================================================

#[tokio::test]
async fn test_status_when_idle() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/status").await;
    response.assert_status_ok();

    let status: Value = response.json();
    assert_eq!(status["isActive"], false);
    assert_eq!(status["remainingTime"], 0);
    assert_eq!(status["totalLoops"], 0);
    assert_eq!(status["currentLoop"], 0);
}

#[tokio::test]
async fn test_status_while_active() {
    let ctx = TestContext::new().await;
    ctx.start(2, 10).await;

    let status: Value = ctx.server.get("/api/status").await.json();
    assert_eq!(status["isActive"], true);
    assert_eq!(status["frequency"], 2);
    assert_eq!(status["duration"], 10);
    assert_eq!(status["totalLoops"], 5);
    assert_eq!(status["endpoint"], "https://lorem-api.com/api/lorem");

    let remaining = status["remainingTime"].as_u64().unwrap();
    assert!(remaining > 0 && remaining <= 10);
}

#[tokio::test]
async fn test_job_finishes_after_duration() {
    let ctx = TestContext::new().await;
    ctx.start(1, 2).await;

    let status = ctx.wait_until_idle().await;
    assert_eq!(status["currentLoop"], 2);
    assert_eq!(status["totalLoops"], 2);
    assert_eq!(status["remainingTime"], 0);
    assert_eq!(ctx.fetcher.calls(), 2);

    // A finished job frees the slot for the next one
    ctx.start(1, 1).await;
}

#[tokio::test]
async fn test_stop_when_idle_is_rejected() {
    let ctx = TestContext::new().await;

    let response = ctx.server.post("/api/stop").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "No active polling to stop");
}

#[tokio::test]
async fn test_stop_ends_active_job() {
    let ctx = TestContext::new().await;
    ctx.start(1, 60).await;

    let response = ctx.server.post("/api/stop").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Polling stopped");

    let status: Value = ctx.server.get("/api/status").await.json();
    assert_eq!(status["isActive"], false);
    assert_eq!(status["remainingTime"], 0);
}

fn job_active_gauge(metrics: &str) -> f64 {
    metrics
        .lines()
        .find_map(|line| line.strip_prefix("poller_job_active "))
        .and_then(|value| value.trim().parse().ok())
        .expect("poller_job_active missing from /metrics")
}

#[tokio::test]
async fn test_concurrent_stop_and_start_keep_gauge_consistent() {
    let ctx = TestContext::new().await;
    ctx.start(1, 30).await;

    let restart = json!({"endpoint": "https://example.com", "frequency": 2, "duration": 30});
    let (stop, start) = tokio::join!(
        async { ctx.server.post("/api/stop").await },
        async { ctx.server.post("/api/start").json(&restart).await }
    );
    stop.assert_status_ok();

    let status: Value = ctx.server.get("/api/status").await.json();
    let metrics = ctx.server.get("/metrics").await.text();
    let gauge = job_active_gauge(&metrics);

    if start.status_code() == StatusCode::OK {
        assert_eq!(status["isActive"], true);
        assert_eq!(status["frequency"], 2);
        assert_eq!(gauge, 1.0);
    } else {
        start.assert_status(StatusCode::CONFLICT);
        assert_eq!(status["isActive"], false);
        assert_eq!(gauge, 0.0);
    }
}
