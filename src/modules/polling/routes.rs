use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn polling_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/status", get(controller::get_status))
        .route("/start", post(controller::start_polling))
        .route("/stop", post(controller::stop_polling))
        .route("/data", get(controller::get_data))
        .route("/clear", delete(controller::clear_data))
}
