use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::form::PollingForm;

pub const NO_DATA_MESSAGE: &str = "No data available. Start polling to collect responses.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    #[serde(rename = "")]
    None,
    Success,
    Error,
    Info,
}

/// The single message slot shown above the controls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UiMessage {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

impl UiMessage {
    pub fn success(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Success }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Error }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self { text: text.into(), kind: MessageKind::Info }
    }

    pub fn is_empty(&self) -> bool {
        self.kind == MessageKind::None && self.text.is_empty()
    }
}

/// Local copy of the backend status. Only ever updated by merging a [`StatusUpdate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PollingStatus {
    pub is_active: bool,
    pub frequency: u64,
    pub remaining_time: u64,
    pub total_loops: u64,
    pub current_loop: u64,
    pub endpoint: Option<String>,
    pub duration: Option<u64>,
    pub failed_loops: Option<u64>,
}

/// Body of `GET /api/status`. Every field is optional; absent fields keep their local value.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusUpdate {
    pub is_active: Option<bool>,
    pub frequency: Option<u64>,
    pub remaining_time: Option<u64>,
    pub total_loops: Option<u64>,
    pub current_loop: Option<u64>,
    pub endpoint: Option<String>,
    pub duration: Option<u64>,
    pub failed_loops: Option<u64>,
}

impl PollingStatus {
    /// Shallow merge: fields present in the update overwrite, the rest are kept.
    pub fn merge(&mut self, update: StatusUpdate) {
        if let Some(v) = update.is_active {
            self.is_active = v;
        }
        if let Some(v) = update.frequency {
            self.frequency = v;
        }
        if let Some(v) = update.remaining_time {
            self.remaining_time = v;
        }
        if let Some(v) = update.total_loops {
            self.total_loops = v;
        }
        if let Some(v) = update.current_loop {
            self.current_loop = v;
        }
        if update.endpoint.is_some() {
            self.endpoint = update.endpoint;
        }
        if update.duration.is_some() {
            self.duration = update.duration;
        }
        if update.failed_loops.is_some() {
            self.failed_loops = update.failed_loops;
        }
    }

    pub fn progress_percentage(&self) -> f64 {
        if self.total_loops == 0 {
            return 0.0;
        }
        self.current_loop as f64 / self.total_loops as f64 * 100.0
    }
}

/// One stored response as returned by `GET /api/data`. Unknown fields are kept in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FetchedItem {
    #[serde(default)]
    pub activity: Value,
    #[serde(default)]
    pub timestamp: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub form: PollingForm,
    pub message: UiMessage,
    pub items: Vec<FetchedItem>,
    pub loading: bool,
    pub status: PollingStatus,
    pub last_fetch_time: Option<DateTime<Local>>,
}

impl DashboardState {
    pub fn can_start(&self) -> bool {
        !self.loading && !self.status.is_active
    }

    /// The stop control only exists while the backend reports an active job.
    pub fn can_stop(&self) -> bool {
        !self.loading && self.status.is_active
    }

    pub fn can_refresh(&self) -> bool {
        !self.loading
    }

    pub fn can_clear(&self) -> bool {
        !self.loading && !self.items.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}
