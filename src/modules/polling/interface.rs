use axum::{http::StatusCode, Json};

use super::schema::ErrorResponse;
use crate::services::poller::SchedulerError;
use crate::services::store::StoreError;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PollingError {
    #[error("{0}")]
    Validation(String),

    #[error("Only http and https endpoints can be polled")]
    UnsupportedScheme,

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Storage error: {0}")]
    Store(#[from] StoreError),
}

impl PollingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedScheme => StatusCode::BAD_REQUEST,
            Self::Scheduler(SchedulerError::AlreadyActive) => StatusCode::CONFLICT,
            Self::Scheduler(SchedulerError::NotActive) => StatusCode::BAD_REQUEST,
            Self::Scheduler(SchedulerError::DurationOutOfRange) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>) {
        (self.status_code(), Json(ErrorResponse::new(self.to_string())))
    }
}
