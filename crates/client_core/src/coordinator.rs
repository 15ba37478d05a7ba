//! Upload/query state machine for a single document session.
//!
//! The coordinator owns the [`SessionState`] and [`Timeline`] exclusively.
//! Front ends hold an `Arc<Coordinator>`, call the two submit operations and
//! render from the read-only views; they never see a raw transport error
//! that is not also on the timeline.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, MutexGuard, PoisonError,
};

use serde::Serialize;
use shared::domain::{DocumentStatus, SessionId};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

use crate::{
    document::DocumentFile,
    error::ClientError,
    remote::RemoteClient,
    session::SessionState,
    timeline::{ConversationEvent, Timeline},
};

const EVENT_CHANNEL_CAPACITY: usize = 256;

pub const UPLOAD_FIRST_WARNING: &str = "Upload a document first";
pub const NO_DOCUMENT_WARNING: &str = "No document selected";
pub const CANCELLED_REASON: &str = "request was cancelled";

/// Mutual-exclusion flag shared by the upload and query paths.
#[derive(Debug, Default)]
pub struct RequestLock {
    busy: AtomicBool,
}

impl RequestLock {
    pub fn try_acquire(&self) -> Result<RequestGuard<'_>, ClientError> {
        if self.busy.swap(true, Ordering::AcqRel) {
            return Err(ClientError::Busy);
        }
        Ok(RequestGuard { lock: self })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the request lock when dropped, on every exit path.
#[must_use = "dropping the guard releases the request lock immediately"]
pub struct RequestGuard<'a> {
    lock: &'a RequestLock,
}

impl Drop for RequestGuard<'_> {
    fn drop(&mut self) {
        self.lock.busy.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RemoteOperation {
    Upload,
    Query,
}

/// Settles an outstanding remote call whose future was dropped before the
/// outcome arrived. Must be declared after the [`RequestGuard`] so it runs
/// while the request lock is still held.
struct InFlight<'a> {
    coordinator: &'a Coordinator,
    operation: RemoteOperation,
    settled: bool,
}

impl<'a> InFlight<'a> {
    fn new(coordinator: &'a Coordinator, operation: RemoteOperation) -> Self {
        Self {
            coordinator,
            operation,
            settled: false,
        }
    }

    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        let mut inner = self.coordinator.state();
        let notice = match self.operation {
            RemoteOperation::Upload => {
                if inner.session.fail_upload().is_err() {
                    return;
                }
                format!("Failed to upload: {CANCELLED_REASON}")
            }
            RemoteOperation::Query => format!("Failed to get answer: {CANCELLED_REASON}"),
        };
        warn!(operation = ?self.operation, "request: dropped before completion");
        self.coordinator
            .append(&mut inner, ConversationEvent::error(notice));
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: DocumentStatus,
    pub file_name: Option<String>,
    pub busy: bool,
    pub timeline_len: usize,
}

#[derive(Default)]
struct CoordinatorState {
    session: SessionState,
    timeline: Timeline,
}

pub struct Coordinator {
    remote: Arc<dyn RemoteClient>,
    request_lock: RequestLock,
    inner: Mutex<CoordinatorState>,
    events: broadcast::Sender<ConversationEvent>,
}

impl Coordinator {
    pub fn new(remote: Arc<dyn RemoteClient>) -> Arc<Self> {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Arc::new(Self {
            remote,
            request_lock: RequestLock::default(),
            inner: Mutex::new(CoordinatorState::default()),
            events,
        })
    }

    /// Uploads `file` and makes it the current document.
    ///
    /// Invalid input is reported on the timeline without taking the request
    /// lock. Returns the new session id on success.
    pub async fn submit_file(&self, file: Option<DocumentFile>) -> Result<SessionId, ClientError> {
        let Some(file) = file else {
            self.record(ConversationEvent::warning(NO_DOCUMENT_WARNING));
            return Err(ClientError::validation("no document selected"));
        };
        if let Err(err) = file.validate() {
            warn!(file_name = %file.name, "upload: rejected before sending: {err}");
            self.record(ConversationEvent::warning(err.to_string()));
            return Err(err);
        }

        let _guard = self.request_lock.try_acquire().inspect_err(|_| {
            warn!(file_name = %file.name, "upload: ignored while another request is in flight");
        })?;

        {
            let mut inner = self.state();
            inner.session.begin_upload(file.name.clone())?;
            self.append(
                &mut inner,
                ConversationEvent::file_notice(format!("Uploading: {}", file.name)),
            );
        }
        info!(
            file_name = %file.name,
            size_bytes = file.bytes.len(),
            "upload: started"
        );

        let mut in_flight = InFlight::new(self, RemoteOperation::Upload);
        let outcome = self.remote.upload(&file).await;
        in_flight.settle();

        let mut inner = self.state();
        match outcome {
            Ok(session_id) => {
                inner.session.complete_upload(session_id.clone())?;
                self.append(
                    &mut inner,
                    ConversationEvent::system_notice(format!(
                        "{} indexed successfully",
                        file.name
                    )),
                );
                info!(file_name = %file.name, session_id = %session_id, "upload: indexed");
                Ok(session_id)
            }
            Err(err) => {
                inner.session.fail_upload()?;
                self.append(
                    &mut inner,
                    ConversationEvent::error(format!("Failed to upload: {err}")),
                );
                error!(file_name = %file.name, "upload: failed: {err}");
                Err(err)
            }
        }
    }

    /// Asks a question about the indexed document and returns the answer.
    pub async fn submit_question(&self, text: &str) -> Result<String, ClientError> {
        let question = text.trim();
        if question.is_empty() {
            return Err(ClientError::validation("question is empty"));
        }

        let (session_id, _guard) = {
            let mut inner = self.state();
            let Some(session_id) = inner.session.session_id().cloned() else {
                self.append(&mut inner, ConversationEvent::warning(UPLOAD_FIRST_WARNING));
                return Err(ClientError::NotIndexed);
            };
            let guard = self.request_lock.try_acquire().inspect_err(|_| {
                warn!(session_id = %session_id, "query: ignored while another request is in flight");
            })?;
            self.append(&mut inner, ConversationEvent::user(question));
            (session_id, guard)
        };
        info!(session_id = %session_id, "query: sent");

        let mut in_flight = InFlight::new(self, RemoteOperation::Query);
        let outcome = self.remote.ask(&session_id, question).await;
        in_flight.settle();

        let mut inner = self.state();
        match outcome {
            Ok(answer) => {
                self.append(&mut inner, ConversationEvent::assistant(answer.clone()));
                info!(session_id = %session_id, "query: answered");
                Ok(answer)
            }
            Err(err) => {
                self.append(
                    &mut inner,
                    ConversationEvent::error(format!("Failed to get answer: {err}")),
                );
                error!(session_id = %session_id, "query: failed: {err}");
                Err(err)
            }
        }
    }

    /// Discards the current session and timeline and starts over.
    pub fn reset(&self) -> Result<(), ClientError> {
        let _guard = self.request_lock.try_acquire()?;
        let mut inner = self.state();
        *inner = CoordinatorState::default();
        info!("session: reset");
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.request_lock.is_busy()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let inner = self.state();
        SessionSnapshot {
            status: inner.session.status().clone(),
            file_name: inner.session.file_name().map(str::to_string),
            busy: self.is_busy(),
            timeline_len: inner.timeline.len(),
        }
    }

    pub fn timeline(&self) -> Vec<ConversationEvent> {
        self.state().timeline.events().to_vec()
    }

    pub fn timeline_since(&self, cursor: usize) -> Vec<ConversationEvent> {
        self.state().timeline.since(cursor).to_vec()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<ConversationEvent> {
        self.events.subscribe()
    }

    fn record(&self, event: ConversationEvent) {
        let mut inner = self.state();
        self.append(&mut inner, event);
    }

    /// Never held across a remote call.
    fn state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn append(&self, inner: &mut CoordinatorState, event: ConversationEvent) {
        let appended = inner.timeline.append(event).clone();
        let _ = self.events.send(appended);
    }
}

#[cfg(test)]
#[path = "tests/coordinator_tests.rs"]
mod tests;
