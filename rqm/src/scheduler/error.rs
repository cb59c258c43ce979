//! Scheduler construction errors
//!
//! Enqueueing never fails; only building a scheduler can.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Rate interval must be greater than zero")]
    ZeroInterval,

    #[error("No tokio runtime available to drive dispatch timers")]
    NoRuntime,
}
