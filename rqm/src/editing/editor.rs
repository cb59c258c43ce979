//! Editor - turns edit requests into rate-limited, retrying tasks

use std::sync::Arc;

use tracing::debug;

use super::client::{EditTransport, RawResponse};
use super::error::EditError;
use super::request::EditRequest;
use crate::retry::{Completion, RetryPolicy, RetryingRequest};
use crate::scheduler::RequestManager;

/// Submits edits through a shared scheduler
///
/// Every edit becomes one scheduler task per attempt. A failed attempt is
/// re-queued at the head of the scheduler, subject to the retry policy, when
/// the request is [`retryable`](EditRequest::retryable) and the error passes
/// [`EditError::is_retryable`]. Creating edits are sent once.
#[derive(Clone)]
pub struct Editor {
    manager: RequestManager,
    transport: Arc<dyn EditTransport>,
    policy: RetryPolicy,
}

impl Editor {
    pub fn new(manager: RequestManager, transport: Arc<dyn EditTransport>, policy: RetryPolicy) -> Self {
        debug!(?policy, "Editor::new: called");
        Self {
            manager,
            transport,
            policy,
        }
    }

    pub fn manager(&self) -> &RequestManager {
        &self.manager
    }

    /// Queue one edit at the tail of the scheduler
    pub fn submit(&self, request: EditRequest) -> Completion<RawResponse, EditError> {
        debug!(%request, "Editor::submit: called");
        let label = request.to_string();
        let resend = request.retryable;
        let transport = self.transport.clone();
        let request = Arc::new(request);

        RetryingRequest::new(move || {
            let transport = transport.clone();
            let request = request.clone();
            async move { transport.send(&request).await }
        })
        .with_label(label)
        .with_policy(self.policy)
        .retry_if(move |error: &EditError| resend && error.is_retryable())
        .submit(&self.manager)
    }

    /// Queue edits in order; completions come back in the same order
    pub fn submit_all<I>(&self, requests: I) -> Vec<Completion<RawResponse, EditError>>
    where
        I: IntoIterator<Item = EditRequest>,
    {
        requests.into_iter().map(|request| self.submit(request)).collect()
    }
}
