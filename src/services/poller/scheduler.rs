use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use uuid::Uuid;

use super::fetcher::Fetcher;
use super::types::{FinishReason, PollingPlan, PollingStatus, SchedulerError};
use crate::services::metrics::{FetchOutcome, MetricsTimer, PollingMetricsCollector};
use crate::services::store::{ResponseStore, StoredResponse};

/// Progress of one job, shared between the job task and status readers
struct JobProgress {
    id: Uuid,
    plan: PollingPlan,
    deadline: Instant,
    started_wall: DateTime<Utc>,
    completed: AtomicU64,
    failed: AtomicU64,
    running: AtomicBool,
}

impl JobProgress {
    /// `None` when the plan's duration cannot be represented as a deadline
    fn new(plan: PollingPlan) -> Option<Self> {
        let deadline = Instant::now().checked_add(plan.duration())?;
        Some(Self {
            id: Uuid::new_v4(),
            plan,
            deadline,
            started_wall: Utc::now(),
            completed: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            running: AtomicBool::new(true),
        })
    }

    fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> PollingStatus {
        let is_active = self.is_running();
        let remaining_time = if is_active {
            self.deadline
                .saturating_duration_since(Instant::now())
                .as_millis()
                .div_ceil(1000) as u64
        } else {
            0
        };

        PollingStatus {
            is_active,
            endpoint: Some(self.plan.endpoint.clone()),
            frequency: self.plan.frequency,
            duration: self.plan.duration,
            remaining_time,
            total_loops: self.plan.total_loops(),
            current_loop: self.completed.load(Ordering::SeqCst),
            failed_loops: self.failed.load(Ordering::SeqCst),
            started_at: Some(self.started_wall),
        }
    }
}

struct ActiveJob {
    progress: Arc<JobProgress>,
    cancel: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// Everything a running job needs, cloned into its task
#[derive(Clone)]
struct JobContext {
    fetcher: Arc<dyn Fetcher>,
    store: Arc<dyn ResponseStore>,
    metrics: PollingMetricsCollector,
    slot: Arc<Mutex<Option<ActiveJob>>>,
}

/// Runs at most one polling job at a time
pub struct PollingService {
    ctx: JobContext,
    last: RwLock<Option<Arc<JobProgress>>>,
}

impl PollingService {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        store: Arc<dyn ResponseStore>,
        metrics: PollingMetricsCollector,
    ) -> Self {
        Self {
            ctx: JobContext {
                fetcher,
                store,
                metrics,
                slot: Arc::new(Mutex::new(None)),
            },
            last: RwLock::new(None),
        }
    }

    /// Start a new job. Fails if one is already running.
    pub async fn start(&self, plan: PollingPlan) -> Result<PollingStatus, SchedulerError> {
        let mut slot = self.ctx.slot.lock().await;
        if slot.as_ref().is_some_and(|job| job.progress.is_running()) {
            return Err(SchedulerError::AlreadyActive);
        }

        let progress = JobProgress::new(plan).ok_or(SchedulerError::DurationOutOfRange)?;
        let progress = Arc::new(progress);
        let (cancel, cancel_rx) = watch::channel(false);

        tracing::info!(
            job_id = %progress.id,
            endpoint = %progress.plan.endpoint,
            frequency = progress.plan.frequency,
            duration = progress.plan.duration,
            "Starting polling job"
        );
        self.ctx.metrics.record_job_started();

        let handle = tokio::spawn(run_job(self.ctx.clone(), progress.clone(), cancel_rx));
        let status = progress.snapshot();

        *self.last.write().await = Some(progress.clone());
        *slot = Some(ActiveJob {
            progress,
            cancel,
            handle,
        });

        Ok(status)
    }

    /// Cancel the running job and wait for its task to exit. The slot stays
    /// locked until the task is gone, so a concurrent start waits for it.
    pub async fn stop(&self) -> Result<PollingStatus, SchedulerError> {
        let mut slot = self.ctx.slot.lock().await;
        let job = match slot.take() {
            Some(job) if job.progress.is_running() => job,
            other => {
                *slot = other;
                return Err(SchedulerError::NotActive);
            }
        };

        tracing::info!(job_id = %job.progress.id, "Stopping polling job");
        let _ = job.cancel.send(true);
        if let Err(e) = job.handle.await {
            tracing::error!(job_id = %job.progress.id, "Polling task failed: {}", e);
            if job.progress.running.swap(false, Ordering::SeqCst) {
                self.ctx.metrics.record_job_finished("failed");
            }
        }
        drop(slot);

        Ok(job.progress.snapshot())
    }

    pub async fn status(&self) -> PollingStatus {
        match self.last.read().await.as_ref() {
            Some(progress) => progress.snapshot(),
            None => PollingStatus::default(),
        }
    }

    pub async fn is_active(&self) -> bool {
        self.status().await.is_active
    }
}

async fn run_job(ctx: JobContext, progress: Arc<JobProgress>, mut cancel: watch::Receiver<bool>) {
    let plan = &progress.plan;
    let deadline = progress.deadline;
    let total_loops = plan.total_loops();

    let mut interval = tokio::time::interval(plan.interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let reason = loop {
        tokio::select! {
            _ = interval.tick() => {}
            _ = cancel.changed() => break FinishReason::Stopped,
        }

        if Instant::now() >= deadline {
            break FinishReason::Elapsed;
        }

        let loop_index = progress.completed.load(Ordering::SeqCst) + 1;
        let timer = MetricsTimer::new();
        let result = tokio::select! {
            result = ctx.fetcher.fetch(&plan.endpoint) => result,
            _ = cancel.changed() => break FinishReason::Stopped,
        };

        match result {
            Ok(payload) => {
                ctx.metrics.record_fetch(FetchOutcome::Success, timer.elapsed_secs());
                let response =
                    StoredResponse::new(&plan.endpoint, loop_index, payload.status, payload.body);
                if let Err(e) = ctx.store.append(response).await {
                    tracing::error!(job_id = %progress.id, "Failed to store response: {}", e);
                }
                if let Ok(count) = ctx.store.len().await {
                    ctx.metrics.set_stored_responses(count);
                }
                tracing::debug!(job_id = %progress.id, loop_index, "Stored polled response");
            }
            Err(e) => {
                ctx.metrics.record_fetch(FetchOutcome::Failure, timer.elapsed_secs());
                progress.failed.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(
                    job_id = %progress.id,
                    loop_index,
                    endpoint = %plan.endpoint,
                    "Polling fetch failed: {}",
                    e
                );
            }
        }

        if progress.completed.fetch_add(1, Ordering::SeqCst) + 1 >= total_loops {
            // Stay active until the configured duration has elapsed
            tokio::select! {
                _ = tokio::time::sleep_until(deadline) => break FinishReason::Completed,
                _ = cancel.changed() => break FinishReason::Stopped,
            }
        }
    };

    if reason == FinishReason::Stopped {
        // stop() holds the slot until this task returns
        finish(&ctx, &progress, reason);
        return;
    }

    tokio::select! {
        mut slot = ctx.slot.lock() => {
            finish(&ctx, &progress, reason);
            if slot.as_ref().is_some_and(|job| job.progress.id == progress.id) {
                *slot = None;
            }
        }
        // A stop() raced the natural finish and owns the slot
        _ = cancel.changed() => finish(&ctx, &progress, reason),
    }
}

/// Marks the job finished. Callers hold the slot, so no newer job can have
/// set the active gauge in between.
fn finish(ctx: &JobContext, progress: &JobProgress, reason: FinishReason) {
    ctx.metrics.record_job_finished(reason.as_label());
    progress.running.store(false, Ordering::SeqCst);
    tracing::info!(
        job_id = %progress.id,
        reason = reason.as_label(),
        loops = progress.completed.load(Ordering::SeqCst),
        "Polling job finished"
    );
}
