//! Retry descriptors layered on the scheduler
//!
//! A [`RetryingRequest`] pairs an operation builder with an attempt counter
//! and a [`RetryPolicy`]. Failed attempts are re-queued at the head of the
//! same [`RequestManager`](crate::scheduler::RequestManager), so a retry runs
//! before newer work without the scheduler knowing anything about failures.

mod error;
mod policy;
mod request;

pub use error::RetryError;
pub use policy::RetryPolicy;
pub use request::{Completion, Operation, RetryingRequest};
