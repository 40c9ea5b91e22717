use chrono::Local;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use super::client::{ClientError, PollingApi};
use super::form::PollingForm;
use super::state::{DashboardState, UiMessage, NO_DATA_MESSAGE};

pub const STATUS_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// What happened to a user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The control was disabled, no request was sent
    Skipped,
    Succeeded,
    Failed,
}

/// Dashboard state plus the operations behind its controls.
///
/// Every action clears the message slot, sets `loading`, and clears `loading` again when it
/// completes. Responses are applied as they arrive; there is no staleness check, so when two
/// requests overlap the last one to resolve wins.
pub struct Dashboard<A: PollingApi + 'static> {
    api: Arc<A>,
    state: Arc<RwLock<DashboardState>>,
}

impl<A: PollingApi + 'static> Clone for Dashboard<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
        }
    }
}

impl<A: PollingApi + 'static> Dashboard<A> {
    pub fn new(api: A) -> Self {
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<A>) -> Self {
        Self {
            api,
            state: Arc::new(RwLock::new(DashboardState::default())),
        }
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn edit_form(&self, edit: impl FnOnce(&mut PollingForm)) {
        edit(&mut self.state.write().await.form);
    }

    /// Initial data fetch and status check, then a status check every second until the
    /// returned ticker is dropped.
    pub async fn mount(&self) -> StatusTicker {
        self.refresh_data().await;
        if let Err(e) = self.check_status().await {
            tracing::warn!("Error checking polling status: {}", e);
        }

        let dashboard = self.clone();
        let handle = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + STATUS_POLL_INTERVAL;
            let mut interval = tokio::time::interval_at(start, STATUS_POLL_INTERVAL);
            loop {
                interval.tick().await;
                if let Err(e) = dashboard.check_status().await {
                    tracing::warn!("Error checking polling status: {}", e);
                }
            }
        });

        StatusTicker { handle }
    }

    /// Merge the backend status into local state. Never touches the message slot.
    pub async fn check_status(&self) -> Result<(), ClientError> {
        let update = self.api.status().await?;
        self.state.write().await.status.merge(update);
        Ok(())
    }

    pub async fn start_polling(&self) -> ActionOutcome {
        let Some(form) = self.begin(DashboardState::can_start).await else {
            return ActionOutcome::Skipped;
        };

        let config = form.to_configuration();
        let outcome = match self.api.start(&config).await {
            Ok(confirmed) => {
                tracing::info!(
                    endpoint = %config.endpoint,
                    frequency = confirmed.frequency,
                    duration = confirmed.duration,
                    "Polling started"
                );
                self.set_message(UiMessage::success(format!(
                    "Started polling every {}s for {}s",
                    confirmed.frequency, confirmed.duration
                )))
                .await;
                self.load_data(false).await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                self.set_message(UiMessage::error(e.message_or("Failed to start polling")))
                    .await;
                ActionOutcome::Failed
            }
        };

        self.finish().await;
        outcome
    }

    pub async fn stop_polling(&self) -> ActionOutcome {
        if self.begin(DashboardState::can_stop).await.is_none() {
            return ActionOutcome::Skipped;
        }

        let outcome = match self.api.stop().await {
            Ok(reply) => {
                let text = reply.message.unwrap_or_else(|| "Polling stopped".to_string());
                self.set_message(UiMessage::success(text)).await;
                self.load_data(false).await;
                ActionOutcome::Succeeded
            }
            Err(e) => {
                self.set_message(UiMessage::error(e.message_or("Failed to stop polling")))
                    .await;
                ActionOutcome::Failed
            }
        };

        self.finish().await;
        outcome
    }

    pub async fn refresh_data(&self) -> ActionOutcome {
        if self.begin(DashboardState::can_refresh).await.is_none() {
            return ActionOutcome::Skipped;
        }

        let outcome = self.load_data(true).await;
        self.finish().await;
        outcome
    }

    pub async fn clear_data(&self) -> ActionOutcome {
        if self.begin(DashboardState::can_clear).await.is_none() {
            return ActionOutcome::Skipped;
        }

        let outcome = match self.api.clear().await {
            Ok(reply) => {
                let mut state = self.state.write().await;
                state.items.clear();
                state.last_fetch_time = Some(Local::now());
                state.message = UiMessage::success(
                    reply.message.unwrap_or_else(|| "All data cleared".to_string()),
                );
                ActionOutcome::Succeeded
            }
            Err(e) => {
                self.set_message(UiMessage::error(e.message_or("Failed to clear data")))
                    .await;
                ActionOutcome::Failed
            }
        };

        self.finish().await;
        outcome
    }

    /// Snapshot replace of the item list. With `announce`, an empty list or a failure is
    /// reported in the message slot; follow-up reloads after start/stop keep that action's
    /// message instead.
    async fn load_data(&self, announce: bool) -> ActionOutcome {
        match self.api.data().await {
            Ok(items) => {
                let mut state = self.state.write().await;
                let empty = items.is_empty();
                state.items = items;
                state.last_fetch_time = Some(Local::now());
                if announce && empty {
                    state.message = UiMessage::info(NO_DATA_MESSAGE);
                }
                ActionOutcome::Succeeded
            }
            Err(e) => {
                tracing::debug!("Data fetch failed: {}", e);
                if announce {
                    self.set_message(UiMessage::error(e.message_or("Failed to fetch data")))
                        .await;
                }
                ActionOutcome::Failed
            }
        }
    }

    /// Check the control is enabled and, if so, enter the loading state with an empty message.
    /// Returns the form as it was when the action began.
    async fn begin(&self, enabled: fn(&DashboardState) -> bool) -> Option<PollingForm> {
        let mut state = self.state.write().await;
        if !enabled(&state) {
            return None;
        }
        state.loading = true;
        state.message = UiMessage::default();
        Some(state.form.clone())
    }

    async fn finish(&self) {
        self.state.write().await.loading = false;
    }

    async fn set_message(&self, message: UiMessage) {
        self.state.write().await.message = message;
    }
}

/// The once-a-second status check started by [`Dashboard::mount`]. Dropping it unmounts.
pub struct StatusTicker {
    handle: JoinHandle<()>,
}

impl StatusTicker {
    pub fn unmount(self) {
        drop(self);
    }

    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for StatusTicker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
