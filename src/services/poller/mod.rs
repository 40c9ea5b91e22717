pub mod fetcher;
pub mod scheduler;
pub mod types;

pub use fetcher::{FetchError, FetchedPayload, Fetcher, HttpFetcher};
pub use scheduler::PollingService;
pub use types::{FinishReason, PollingPlan, PollingStatus, SchedulerError};
