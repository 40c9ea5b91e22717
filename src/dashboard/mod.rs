//! Client-side model of the polling dashboard: form handling, the single message slot,
//! the snapshot of stored responses, and the once-a-second status poll.

pub mod client;
pub mod controller;
pub mod form;
pub mod state;
pub mod view;

pub use client::{ClientError, DashboardClient, PollingApi};
pub use controller::{ActionOutcome, Dashboard, StatusTicker};
pub use form::{PollingConfiguration, PollingForm};
pub use state::{DashboardState, FetchedItem, MessageKind, PollingStatus, StatusUpdate, UiMessage};
pub use view::Card;
