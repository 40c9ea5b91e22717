use serde_json::Value;

use axum::http::StatusCode;
use std::sync::Arc;

use crate::common::{StubFetcher, TestContext, UnavailableStore};

// =============================================================================
// INTEGRATION TESTS - STORED DATA (GET /api/data, DELETE /api/clear)
// =============================================================================

#[tokio::test]
async fn test_data_empty_initially() {
    let ctx = TestContext::new().await;

    let response = ctx.server.get("/api/data").await;
    response.assert_status_ok();

    let data: Vec<Value> = response.json();
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_data_contains_polled_responses() {
    let ctx = TestContext::new().await;
    ctx.start(1, 2).await;
    ctx.wait_until_idle().await;

    let data: Vec<Value> = ctx.server.get("/api/data").await.json();
    assert_eq!(data.len(), 2);

    assert_eq!(data[0]["activity"], "Run");
    assert_eq!(data[0]["loop"], 1);
    assert_eq!(data[0]["statusCode"], 200);
    assert_eq!(data[0]["endpoint"], "https://lorem-api.com/api/lorem");
    assert_eq!(data[0]["data"]["n"], 1);
    assert!(data[0]["timestamp"].as_i64().unwrap() > 0);
    assert_eq!(data[1]["loop"], 2);
    assert!(data[0]["timestamp"].as_i64() <= data[1]["timestamp"].as_i64());
}

#[tokio::test]
async fn test_clear_removes_everything() {
    let ctx = TestContext::new().await;
    ctx.start(1, 1).await;
    ctx.wait_until_idle().await;

    let response = ctx.server.delete("/api/clear").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["message"], "Cleared 1 responses");

    let data: Vec<Value> = ctx.server.get("/api/data").await.json();
    assert!(data.is_empty());

    let body: Value = ctx.server.delete("/api/clear").await.json();
    assert_eq!(body["message"], "Cleared 0 responses");
}

#[tokio::test]
async fn test_failed_fetches_are_not_stored() {
    let ctx = TestContext::with_fetcher(StubFetcher::failing()).await;
    ctx.start(1, 1).await;

    let status = ctx.wait_until_idle().await;
    assert_eq!(status["currentLoop"], 1);
    assert_eq!(status["failedLoops"], 1);

    let data: Vec<Value> = ctx.server.get("/api/data").await.json();
    assert!(data.is_empty());
}

#[tokio::test]
async fn test_store_failure_returns_server_error() {
    let ctx = TestContext::with_store(Arc::new(UnavailableStore)).await;

    let response = ctx.server.get("/api/data").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["error"], "Storage error: Store unavailable: backend offline");

    let response = ctx.server.delete("/api/clear").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_job_keeps_running_when_store_rejects_writes() {
    let ctx = TestContext::with_store(Arc::new(UnavailableStore)).await;
    ctx.start(1, 2).await;

    let status = ctx.wait_until_idle().await;
    assert_eq!(status["currentLoop"], 2);
    assert_eq!(status["failedLoops"], 0);
    assert_eq!(ctx.fetcher.calls(), 2);
}
