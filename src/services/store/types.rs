use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A payload fetched by a polling job, in the shape returned by `GET /api/data`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StoredResponse {
    pub activity: Option<String>,
    /// Unix epoch milliseconds at which the fetch completed
    pub timestamp: i64,
    pub endpoint: String,
    #[serde(rename = "loop")]
    pub loop_index: u64,
    pub status_code: u16,
    pub data: Value,
}

impl StoredResponse {
    pub fn new(endpoint: &str, loop_index: u64, status_code: u16, data: Value) -> Self {
        Self {
            activity: activity_of(&data),
            timestamp: chrono::Utc::now().timestamp_millis(),
            endpoint: endpoint.to_string(),
            loop_index,
            status_code,
            data,
        }
    }
}

/// Picks a display name out of an arbitrary JSON payload.
fn activity_of(data: &Value) -> Option<String> {
    ["activity", "title", "name"]
        .iter()
        .find_map(|key| data.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

/// Failure reported by a `ResponseStore` backend. The in-memory store never
/// fails; backends plugged in through `AppState::with_store` may.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn append(&self, response: StoredResponse) -> Result<(), StoreError>;

    /// All stored responses, oldest first
    async fn list(&self) -> Result<Vec<StoredResponse>, StoreError>;

    /// Removes everything, returning how many responses were dropped
    async fn clear(&self) -> Result<usize, StoreError>;

    async fn len(&self) -> Result<usize, StoreError>;
}
