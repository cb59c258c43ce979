//! requestmanager - rate-limited request queue for MusicBrainz editing
//!
//! Submits a sequence of state-changing requests to a remote service while
//! keeping a strict minimum interval between the start of consecutive
//! requests. A failed request can be put back at the head of the queue so it
//! is retried before newer work, without disturbing the order of the rest.
//!
//! # Modules
//!
//! - [`scheduler`] - The [`RequestManager`] task queue and its pacing
//! - [`retry`] - Retry descriptors and completion handles on top of it
//! - [`editing`] - MusicBrainz edit request builders and HTTP transport
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod editing;
pub mod retry;
pub mod scheduler;

// Re-export commonly used types
pub use config::{Config, ServerConfig};
pub use editing::{EditError, EditRequest, EditTransport, Editor, HttpEditClient, RawResponse};
pub use retry::{Completion, RetryError, RetryPolicy, RetryingRequest};
pub use scheduler::{QueueState, RequestManager, SchedulerConfig, SchedulerError, SchedulerState, SchedulerStats};
