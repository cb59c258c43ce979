//! Rate-limited task scheduler
//!
//! Paces task dispatch so that consecutive tasks start at least one rate
//! interval apart, with head insertion for retries. The scheduler only
//! sequences and times tasks; what a task does and whether it succeeds is
//! its own business.

mod config;
mod core;
mod error;
mod queue;

pub use config::{DEFAULT_RATE_INTERVAL_MS, SchedulerConfig};
pub use core::RequestManager;
pub use error::SchedulerError;
pub use queue::{Placement, QueueState, SchedulerState, SchedulerStats, Task};
