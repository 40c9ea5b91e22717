use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

/// A validated request to poll `endpoint` every `frequency` seconds for `duration` seconds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollingPlan {
    pub endpoint: String,
    pub frequency: u64,
    pub duration: u64,
}

impl PollingPlan {
    /// Frequency and duration are clamped to at least one second.
    pub fn new(endpoint: impl Into<String>, frequency: u64, duration: u64) -> Self {
        Self {
            endpoint: endpoint.into(),
            frequency: frequency.max(1),
            duration: duration.max(1),
        }
    }

    /// Fetches happen at t = 0, f, 2f, ... while t < duration.
    pub fn total_loops(&self) -> u64 {
        self.duration.div_ceil(self.frequency)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.frequency)
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration)
    }
}

/// Why a polling job stopped running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinishReason {
    Completed,
    Elapsed,
    Stopped,
}

impl FinishReason {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Elapsed => "elapsed",
            Self::Stopped => "stopped",
        }
    }
}

/// Snapshot served by `GET /api/status`
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PollingStatus {
    pub is_active: bool,
    pub endpoint: Option<String>,
    pub frequency: u64,
    pub duration: u64,
    /// Whole seconds left before the job's duration elapses, 0 when idle
    pub remaining_time: u64,
    pub total_loops: u64,
    pub current_loop: u64,
    pub failed_loops: u64,
    pub started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    #[error("Polling is already active")]
    AlreadyActive,

    #[error("No active polling to stop")]
    NotActive,

    #[error("Polling duration is too long to schedule")]
    DurationOutOfRange,
}
