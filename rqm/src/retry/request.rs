//! Retry descriptor and completion handle

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::RetryError;
use super::policy::RetryPolicy;
use crate::scheduler::{Placement, RequestManager, Task};

/// Builds a fresh future for each attempt of an operation
pub type Operation<T, E> = Arc<dyn Fn() -> BoxFuture<'static, Result<T, E>> + Send + Sync>;

type RetryPredicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// A request together with everything needed to retry it
///
/// Each attempt is queued as a scheduler task. A failed attempt is re-queued
/// at the head of the same scheduler as a new attempt, until the policy or
/// the retry predicate says stop.
pub struct RetryingRequest<T, E> {
    id: String,
    label: String,
    operation: Operation<T, E>,
    policy: RetryPolicy,
    retry_if: Option<RetryPredicate<E>>,
}

impl<T, E> fmt::Debug for RetryingRequest<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryingRequest")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<T, E> RetryingRequest<T, E>
where
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    /// Wrap an operation builder; every attempt calls it once
    pub fn new<F, Fut>(operation: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            id: Uuid::now_v7().to_string(),
            label: String::new(),
            operation: Arc::new(move || operation().boxed()),
            policy: RetryPolicy::default(),
            retry_if: None,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Human-readable name used in log lines
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Only retry errors for which the predicate holds
    pub fn retry_if<P>(mut self, predicate: P) -> Self
    where
        P: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.retry_if = Some(Arc::new(predicate));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Queue the first attempt at the tail of the scheduler
    pub fn submit(self, manager: &RequestManager) -> Completion<T, E> {
        debug!(id = %self.id, label = %self.label, policy = ?self.policy, "RetryingRequest::submit: called");
        let (reply, rx) = oneshot::channel();
        let attempt = Attempt {
            request: Arc::new(self),
            number: 1,
            reply,
            manager: manager.clone(),
        };
        manager.enqueue(attempt.into_task(), Placement::Tail);
        Completion { rx }
    }

    fn should_retry(&self, error: &E) -> bool {
        self.retry_if.as_ref().is_none_or(|predicate| predicate(error))
    }
}

/// One attempt of a retrying request, as handed to the scheduler
struct Attempt<T, E> {
    request: Arc<RetryingRequest<T, E>>,
    number: u32,
    reply: oneshot::Sender<Result<T, RetryError<E>>>,
    manager: RequestManager,
}

impl<T, E> Attempt<T, E>
where
    T: Send + 'static,
    E: fmt::Display + Send + 'static,
{
    fn into_task(self) -> Task {
        Box::new(move || {
            let runtime = self.manager.runtime().clone();
            runtime.spawn(self.run());
        })
    }

    async fn run(self) {
        let Attempt {
            request,
            number,
            reply,
            manager,
        } = self;

        debug!(id = %request.id, label = %request.label, attempt = number, "Attempt::run: starting");
        let error = match (request.operation)().await {
            Ok(value) => {
                debug!(id = %request.id, attempt = number, "Attempt::run: succeeded");
                let _ = reply.send(Ok(value));
                return;
            }
            Err(error) => error,
        };

        if !request.should_retry(&error) {
            warn!(id = %request.id, label = %request.label, attempt = number, %error, "Request failed, not retryable");
            let _ = reply.send(Err(RetryError::NotRetryable {
                attempts: number,
                source: error,
            }));
            return;
        }

        if !request.policy.allows_retry(number) {
            warn!(id = %request.id, label = %request.label, attempts = number, %error, "Request failed, retries exhausted");
            let _ = reply.send(Err(RetryError::Exhausted {
                attempts: number,
                source: error,
            }));
            return;
        }

        info!(id = %request.id, label = %request.label, attempt = number, %error, "Request failed, re-queuing at head");
        let next = Attempt {
            request,
            number: number + 1,
            reply,
            manager: manager.clone(),
        };
        manager.enqueue(next.into_task(), Placement::Head);
    }
}

/// Resolves with the outcome of a submitted request
///
/// Dropping a completion does not cancel the request; it keeps running and
/// retrying, only its outcome goes unobserved.
#[must_use = "a Completion does nothing unless awaited"]
pub struct Completion<T, E> {
    rx: oneshot::Receiver<Result<T, RetryError<E>>>,
}

impl<T, E> Future for Completion<T, E> {
    type Output = Result<T, RetryError<E>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|result| result.unwrap_or(Err(RetryError::Abandoned)))
    }
}
