pub mod metrics;
pub mod polling;
