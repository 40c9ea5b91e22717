use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller::{get_metrics, health_check};

pub fn metrics_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/metrics", get(get_metrics))
        .route("/health", get(health_check))
}
