use serde::{Deserialize, Serialize};
use validator::Validate;

// =============================================================================
// START
// =============================================================================

#[derive(Debug, Deserialize, Validate)]
pub struct StartPollingRequest {
    #[validate(url(message = "endpoint must be a valid URL"))]
    pub endpoint: String,
    #[validate(range(
        min = 1,
        max = 31_536_000,
        message = "frequency must be between 1 and 31536000 seconds"
    ))]
    pub frequency: i64,
    #[validate(range(
        min = 1,
        max = 31_536_000,
        message = "duration must be between 1 and 31536000 seconds"
    ))]
    pub duration: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartPollingResponse {
    pub message: String,
    pub endpoint: String,
    pub frequency: u64,
    pub duration: u64,
    pub total_loops: u64,
}

// =============================================================================
// STOP / CLEAR
// =============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
