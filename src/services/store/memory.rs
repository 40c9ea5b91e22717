use async_trait::async_trait;
use std::collections::VecDeque;
use tokio::sync::RwLock;

use super::types::{ResponseStore, StoreError, StoredResponse};

/// Bounded in-memory store. Once `capacity` is reached the oldest response is evicted.
pub struct InMemoryStore {
    responses: RwLock<VecDeque<StoredResponse>>,
    capacity: usize,
}

impl InMemoryStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            responses: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }
}

#[async_trait]
impl ResponseStore for InMemoryStore {
    async fn append(&self, response: StoredResponse) -> Result<(), StoreError> {
        let mut responses = self.responses.write().await;
        while responses.len() >= self.capacity {
            responses.pop_front();
        }
        responses.push_back(response);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<StoredResponse>, StoreError> {
        Ok(self.responses.read().await.iter().cloned().collect())
    }

    async fn clear(&self) -> Result<usize, StoreError> {
        let mut responses = self.responses.write().await;
        let removed = responses.len();
        responses.clear();
        Ok(removed)
    }

    async fn len(&self) -> Result<usize, StoreError> {
        Ok(self.responses.read().await.len())
    }
}
