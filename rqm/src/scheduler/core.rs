//! Scheduler implementation

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::Instant;
use tracing::debug;

use super::config::SchedulerConfig;
use super::error::SchedulerError;
use super::queue::{Placement, QueueState, SchedulerState, SchedulerStats, Task};

/// Internal state protected by mutex
struct SchedulerInner {
    /// Tasks waiting for dispatch, head first
    queue: VecDeque<Task>,

    /// Start of the most recent dispatch
    last_dispatch: Option<Instant>,

    state: SchedulerState,

    /// Dispatch timers spawned but not yet fired
    pending_timers: usize,

    stats: SchedulerStats,
}

struct Shared {
    rate_interval: Duration,
    runtime: Handle,
    inner: Mutex<SchedulerInner>,
}

/// The RequestManager paces task dispatch so that no two tasks start less
/// than one rate interval apart.
///
/// Cloning is cheap and every clone drives the same queue, so a task can hold
/// a clone and `unshift` its own retry. Enqueueing never blocks: a task lands
/// on the queue and is either started on the spot (when the interval since
/// the last dispatch has already elapsed) or picked up by the single pending
/// dispatch timer.
#[derive(Clone)]
pub struct RequestManager {
    shared: Arc<Shared>,
}

impl std::fmt::Debug for RequestManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.queue_state();
        f.debug_struct("RequestManager")
            .field("rate_interval", &self.shared.rate_interval)
            .field("state", &state.state)
            .field("queued", &state.queued)
            .finish()
    }
}

impl RequestManager {
    /// Create a scheduler driven by the current tokio runtime
    pub fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|_| SchedulerError::NoRuntime)?;
        Self::with_runtime(config, runtime)
    }

    /// Create a scheduler whose dispatch timers run on the given runtime
    pub fn with_runtime(config: SchedulerConfig, runtime: Handle) -> Result<Self, SchedulerError> {
        debug!(?config, "RequestManager::with_runtime: called");
        config.validate()?;
        Ok(Self {
            shared: Arc::new(Shared {
                rate_interval: config.rate_interval(),
                runtime,
                inner: Mutex::new(SchedulerInner {
                    queue: VecDeque::new(),
                    last_dispatch: None,
                    state: SchedulerState::Idle,
                    pending_timers: 0,
                    stats: SchedulerStats::default(),
                }),
            }),
        })
    }

    /// Minimum spacing between two dispatches
    pub fn rate_interval(&self) -> Duration {
        self.shared.rate_interval
    }

    /// Runtime the dispatch timers run on, for tasks that start async work
    pub fn runtime(&self) -> &Handle {
        &self.shared.runtime
    }

    /// Append a task behind everything already waiting
    pub fn push<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(task), Placement::Tail);
    }

    /// Put a task ahead of everything already waiting
    ///
    /// Used for retries: the retried task jumps newer work but still yields to
    /// anything unshifted after it.
    pub fn unshift<F>(&self, task: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.enqueue(Box::new(task), Placement::Head);
    }

    /// Enqueue a boxed task at the given end of the queue
    pub fn enqueue(&self, task: Task, placement: Placement) {
        let ready = {
            let mut inner = self.lock();
            match placement {
                Placement::Tail => {
                    inner.queue.push_back(task);
                    inner.stats.total_pushed += 1;
                }
                Placement::Head => {
                    inner.queue.push_front(task);
                    inner.stats.total_unshifted += 1;
                }
            }
            inner.stats.peak_queue_depth = inner.stats.peak_queue_depth.max(inner.queue.len());
            debug!(?placement, queued = inner.queue.len(), "RequestManager::enqueue: called");

            // Only the empty -> one transition starts a dispatch chain; any
            // longer queue already has a timer in flight.
            if inner.queue.len() == 1 {
                self.schedule_if_due(&mut inner)
            } else {
                None
            }
        };

        if let Some(task) = ready {
            debug!("RequestManager::enqueue: dispatching immediately");
            task();
        }
    }

    /// Start the head now if the interval has elapsed, otherwise arm a timer
    /// for the remainder. Returns the task to run once the lock is released.
    fn schedule_if_due(&self, inner: &mut SchedulerInner) -> Option<Task> {
        let now = Instant::now();
        inner.state = SchedulerState::Armed;

        if let Some(last) = inner.last_dispatch {
            let elapsed = now.saturating_duration_since(last);
            if elapsed < self.shared.rate_interval {
                let wait = self.shared.rate_interval - elapsed;
                debug!(?elapsed, ?wait, "RequestManager::schedule_if_due: too soon, arming timer");
                self.arm(inner, wait);
                return None;
            }
        }

        let task = self.take_head(inner, now);
        if task.is_some() {
            inner.stats.immediate_dispatches += 1;
        }
        task
    }

    /// Timer callback: dispatch whatever is at the head now
    fn dispatch_head(&self) {
        let task = {
            let mut inner = self.lock();
            inner.pending_timers = inner.pending_timers.saturating_sub(1);
            self.take_head(&mut inner, Instant::now())
        };

        if let Some(task) = task {
            task();
        }
    }

    /// Remove the head, stamp the dispatch time and decide what follows.
    ///
    /// The follow-up (next timer or Idle) is settled here, before the task body
    /// runs, so an enqueue made from inside the task sees a consistent state.
    fn take_head(&self, inner: &mut SchedulerInner, now: Instant) -> Option<Task> {
        let Some(task) = inner.queue.pop_front() else {
            debug!("RequestManager::take_head: queue empty, going idle");
            inner.state = SchedulerState::Idle;
            return None;
        };

        inner.last_dispatch = Some(now);
        inner.stats.total_dispatched += 1;

        if inner.queue.is_empty() {
            inner.state = SchedulerState::Idle;
        } else {
            debug!(remaining = inner.queue.len(), "RequestManager::take_head: more queued, arming timer");
            self.arm(inner, self.shared.rate_interval);
        }

        Some(task)
    }

    fn arm(&self, inner: &mut SchedulerInner, delay: Duration) {
        debug_assert_eq!(inner.pending_timers, 0, "dispatch timer already pending");
        inner.state = SchedulerState::Armed;
        inner.pending_timers += 1;
        inner.stats.timers_armed += 1;
        inner.stats.peak_pending_timers = inner.stats.peak_pending_timers.max(inner.pending_timers);

        let manager = self.clone();
        self.shared.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            manager.dispatch_head();
        });
    }

    /// Number of tasks waiting for dispatch
    pub fn len(&self) -> usize {
        self.lock().queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get current queue state
    pub fn queue_state(&self) -> QueueState {
        let inner = self.lock();
        QueueState {
            state: inner.state,
            queued: inner.queue.len(),
            pending_timers: inner.pending_timers,
            last_dispatch: inner.last_dispatch,
            stats: inner.stats.clone(),
        }
    }

    /// Get the scheduler statistics
    pub fn stats(&self) -> SchedulerStats {
        self.lock().stats.clone()
    }

    fn lock(&self) -> MutexGuard<'_, SchedulerInner> {
        // Tasks never run under the lock, so a poisoned guard still holds a
        // consistent queue.
        self.shared.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
