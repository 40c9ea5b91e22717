use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

use crate::AppState;
use crate::services::poller::{PollingPlan, PollingStatus};
use crate::services::store::StoredResponse;
use super::interface::PollingError;
use super::schema::{ErrorResponse, MessageResponse, StartPollingRequest, StartPollingResponse};

type ApiError = (StatusCode, Json<ErrorResponse>);

// =============================================================================
// GET /api/status
// =============================================================================

pub async fn get_status(State(state): State<Arc<AppState>>) -> Json<PollingStatus> {
    Json(state.poller.status().await)
}

// =============================================================================
// POST /api/start
// =============================================================================

pub async fn start_polling(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<StartPollingRequest>, JsonRejection>,
) -> Result<Json<StartPollingResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| {
        PollingError::Validation(e.body_text()).into_error_response()
    })?;

    if let Err(e) = req.validate() {
        return Err(PollingError::Validation(validation_message(&e)).into_error_response());
    }

    let endpoint = req.endpoint.trim();
    if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
        return Err(PollingError::UnsupportedScheme.into_error_response());
    }

    // validate() guarantees both are >= 1
    let plan = PollingPlan::new(endpoint, req.frequency as u64, req.duration as u64);
    let status = state.poller.start(plan).await.map_err(|e| {
        tracing::warn!("Rejected start request: {}", e);
        PollingError::from(e).into_error_response()
    })?;

    Ok(Json(StartPollingResponse {
        message: format!(
            "Started polling every {}s for {}s",
            status.frequency, status.duration
        ),
        endpoint: endpoint.to_string(),
        frequency: status.frequency,
        duration: status.duration,
        total_loops: status.total_loops,
    }))
}

// =============================================================================
// POST /api/stop
// =============================================================================

pub async fn stop_polling(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let status = state
        .poller
        .stop()
        .await
        .map_err(|e| PollingError::from(e).into_error_response())?;

    tracing::info!(
        loops = status.current_loop,
        total = status.total_loops,
        "Polling stopped on request"
    );
    Ok(Json(MessageResponse::new("Polling stopped")))
}

// =============================================================================
// GET /api/data
// =============================================================================

pub async fn get_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<StoredResponse>>, ApiError> {
    let responses = state
        .store
        .list()
        .await
        .map_err(|e| PollingError::from(e).into_error_response())?;

    Ok(Json(responses))
}

// =============================================================================
// DELETE /api/clear
// =============================================================================

pub async fn clear_data(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let removed = state
        .store
        .clear()
        .await
        .map_err(|e| PollingError::from(e).into_error_response())?;

    state.polling_metrics().set_stored_responses(0);
    tracing::info!(removed, "Cleared stored responses");

    Ok(Json(MessageResponse::new(format!("Cleared {} responses", removed))))
}

/// Flattens validator output into one sentence per failing field, in field order
fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(&b.0));

    fields
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect::<Vec<_>>()
        .join("; ")
}
