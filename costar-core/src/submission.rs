//! Submit flow for a shortest-path request.
//!
//! One submission walks `Idle -> Validating -> Requesting -> (Succeeded |
//! Failed) -> Idle`. At most one submission is in flight at a time; a submit
//! issued while another is running is ignored. Every step is published as an
//! [`AppEvent`] so the view follows along, and the outcome is also returned to
//! the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use thiserror::Error;

use crate::backend::{BackendError, PathBackend};
use crate::model::PickerId;
use crate::reducer::{AppEvent, EventEmitter};
use crate::render::{RenderedPath, render_path};
use crate::selection::SelectionState;

pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Requesting,
    Succeeded,
    Failed,
}

impl SubmissionPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Requesting => "searching",
            Self::Succeeded => "done",
            Self::Failed => "failed",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    ValidationError,
    Timeout,
    SameActor,
    TransportError,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SubmissionError {
    #[error("no actor selected in the {} picker", join_pickers(.missing))]
    Validation { missing: Vec<PickerId> },
    #[error("no response within {}s", .after.as_secs())]
    Timeout { after: Duration },
    #[error("both selections are the same actor")]
    SameActor,
    #[error(transparent)]
    Transport(#[from] BackendError),
}

fn join_pickers(pickers: &[PickerId]) -> String {
    pickers
        .iter()
        .map(|p| p.label())
        .collect::<Vec<_>>()
        .join(" and ")
}

impl SubmissionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::SameActor => ErrorKind::SameActor,
            Self::Transport(_) => ErrorKind::TransportError,
        }
    }

    /// Text shown in the error panel
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { .. } => {
                "Please select an actor from both tables before searching.".to_string()
            }
            Self::Timeout { after } => format!(
                "The search took longer than {} seconds and was cancelled. Try another pair of actors.",
                after.as_secs()
            ),
            Self::SameActor => {
                "Both selections are the same actor. Please pick two different actors.".to_string()
            }
            Self::Transport(_) => {
                "Something went wrong while finding a path. Please try again.".to_string()
            }
        }
    }
}

pub type SubmitOutcome = Result<RenderedPath, SubmissionError>;

/// Holds the in-flight flag for the lifetime of one submission.
///
/// Dropping the guard clears the flag, so it is released on every return
/// path and while unwinding from a panic.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Submission controller, constructed once and shared by clone
#[derive(Clone, Debug)]
pub struct PathSubmission {
    in_flight: Arc<AtomicBool>,
    timeout: Duration,
    events: EventEmitter,
}

impl PathSubmission {
    pub fn new(events: EventEmitter) -> Self {
        Self {
            in_flight: Arc::new(AtomicBool::new(false)),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            events,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Run one submission.
    ///
    /// Returns `None` without touching the backend if another submission is
    /// still in flight.
    pub async fn submit<B>(&self, selections: &SelectionState, backend: &B) -> Option<SubmitOutcome>
    where
        B: PathBackend + ?Sized,
    {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("submit ignored: a submission is already in flight");
            return None;
        };

        self.events.emit(AppEvent::SubmissionStarted);
        let outcome = self.request(selections, backend).await;

        match &outcome {
            Ok(path) => {
                tracing::info!(steps = path.len(), "shortest path found");
                self.events.emit(AppEvent::PathReady { path: path.clone() });
            }
            Err(err) => {
                tracing::warn!(kind = ?err.kind(), error = %err, "submission failed");
                self.events.emit(AppEvent::SubmissionFailed {
                    kind: err.kind(),
                    message: err.user_message(),
                });
            }
        }
        self.events.emit(AppEvent::SubmissionFinished);

        Some(outcome)
    }

    async fn request<B>(&self, selections: &SelectionState, backend: &B) -> SubmitOutcome
    where
        B: PathBackend + ?Sized,
    {
        let (actor_1, actor_2) = selections
            .pair()
            .map_err(|missing| SubmissionError::Validation { missing })?;

        self.events.emit(AppEvent::RequestStarted);
        tracing::info!(
            backend = backend.name(),
            actor_1 = %actor_1,
            actor_2 = %actor_2,
            "requesting shortest path"
        );

        // Dropping the request future on timeout cancels it
        let steps = match tokio::time::timeout(
            self.timeout,
            backend.shortest_path(&actor_1, &actor_2),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(SubmissionError::Timeout { after: self.timeout }),
        };

        if steps.is_empty() {
            return Err(SubmissionError::SameActor);
        }
        Ok(render_path(&steps))
    }
}
