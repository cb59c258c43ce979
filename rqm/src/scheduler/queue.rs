//! Queue types for the scheduler

use std::fmt;

use tokio::time::Instant;

/// One deferred, zero-argument unit of work
///
/// The scheduler owns a task from the moment it is enqueued until it is
/// dispatched, and never looks inside it.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Where a task enters the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Behind everything already waiting
    Tail,
    /// Ahead of everything already waiting
    Head,
}

/// Lifecycle of a scheduler instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchedulerState {
    /// Queue empty, no timer pending
    #[default]
    Idle,
    /// A dispatch timer is pending for the current head
    Armed,
}

impl fmt::Display for SchedulerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerState::Idle => write!(f, "idle"),
            SchedulerState::Armed => write!(f, "armed"),
        }
    }
}

/// Counters kept by a scheduler over its lifetime
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SchedulerStats {
    pub total_pushed: u64,
    pub total_unshifted: u64,
    pub total_dispatched: u64,
    /// Dispatches performed synchronously inside `push`/`unshift`
    pub immediate_dispatches: u64,
    pub timers_armed: u64,
    pub peak_queue_depth: usize,
    /// Highest number of dispatch timers ever pending at once
    pub peak_pending_timers: usize,
}

/// Point-in-time view of a scheduler
#[derive(Debug, Clone)]
pub struct QueueState {
    pub state: SchedulerState,
    pub queued: usize,
    pub pending_timers: usize,
    pub last_dispatch: Option<Instant>,
    pub stats: SchedulerStats,
}

impl QueueState {
    /// True when nothing is queued and no timer is pending
    pub fn is_idle(&self) -> bool {
        self.state == SchedulerState::Idle && self.queued == 0 && self.pending_timers == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(SchedulerState::default(), SchedulerState::Idle);
        assert_eq!(SchedulerState::Armed.to_string(), "armed");
    }

    #[test]
    fn test_queue_state_idle() {
        let state = QueueState {
            state: SchedulerState::Idle,
            queued: 0,
            pending_timers: 0,
            last_dispatch: None,
            stats: SchedulerStats::default(),
        };
        assert!(state.is_idle());

        let armed = QueueState {
            state: SchedulerState::Armed,
            queued: 1,
            pending_timers: 1,
            ..state
        };
        assert!(!armed.is_idle());
    }
}
