use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::TestContext;

// =============================================================================
// INTEGRATION TESTS - START POLLING (POST /api/start)
// =============================================================================

#[tokio::test]
async fn test_start_returns_confirmed_schedule() {
    let ctx = TestContext::new().await;

    let body = ctx.start(1, 3).await;

    assert_eq!(body["frequency"], 1);
    assert_eq!(body["duration"], 3);
    assert_eq!(body["totalLoops"], 3);
    assert_eq!(body["endpoint"], "https://lorem-api.com/api/lorem");
    assert_eq!(body["message"], "Started polling every 1s for 3s");
}

#[tokio::test]
async fn test_start_while_active_conflicts() {
    let ctx = TestContext::new().await;
    ctx.start(1, 30).await;

    let response = ctx
        .server
        .post("/api/start")
        .json(&json!({"endpoint": "https://example.com", "frequency": 1, "duration": 1}))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"], "Polling is already active");
}

#[tokio::test]
async fn test_start_rejects_invalid_url() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/start")
        .json(&json!({"endpoint": "not a url", "frequency": 1, "duration": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "endpoint must be a valid URL");
    assert_eq!(ctx.fetcher.calls(), 0);
}

#[tokio::test]
async fn test_start_rejects_non_http_scheme() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/start")
        .json(&json!({"endpoint": "ftp://example.com/file", "frequency": 1, "duration": 1}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Only http and https endpoints can be polled");
}

#[tokio::test]
async fn test_start_rejects_values_below_one() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/start")
        .json(&json!({"endpoint": "https://example.com", "frequency": 0, "duration": -4}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    let error = body["error"].as_str().unwrap();
    assert!(error.contains("frequency must be between 1 and 31536000 seconds"));
    assert!(error.contains("duration must be between 1 and 31536000 seconds"));
}

#[tokio::test]
async fn test_start_rejects_malformed_body() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/start")
        .json(&json!({"endpoint": "https://example.com", "frequency": "often"}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_concurrent_starts_only_one_wins() {
    let ctx = TestContext::new().await;
    let payload = json!({"endpoint": "https://example.com", "frequency": 1, "duration": 30});

    let responses = futures::future::join_all(
        (0..5).map(|_| async { ctx.server.post("/api/start").json(&payload).await }),
    )
    .await;

    let accepted = responses
        .iter()
        .filter(|r| r.status_code() == StatusCode::OK)
        .count();
    let conflicts = responses
        .iter()
        .filter(|r| r.status_code() == StatusCode::CONFLICT)
        .count();
    assert_eq!(accepted, 1);
    assert_eq!(conflicts, 4);
}

#[tokio::test]
async fn test_start_rejects_duration_beyond_one_year() {
    let ctx = TestContext::new().await;

    let response = ctx
        .server
        .post("/api/start")
        .json(&json!({
            "endpoint": "https://example.com",
            "frequency": 1,
            "duration": i64::MAX
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "duration must be between 1 and 31536000 seconds");

    let status: Value = ctx.server.get("/api/status").await.json();
    assert_eq!(status["isActive"], false);
    assert_eq!(ctx.fetcher.calls(), 0);

    // Nothing was left holding the slot
    ctx.start(1, 1).await;
}

#[tokio::test]
async fn test_start_accepts_one_year_duration() {
    let ctx = TestContext::new().await;

    let body = ctx.start(31_536_000, 31_536_000).await;
    assert_eq!(body["totalLoops"], 1);

    let status: Value = ctx.server.get("/api/status").await.json();
    assert_eq!(status["isActive"], true);
}
