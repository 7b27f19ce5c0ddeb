//! Run state reconstruction
//!
//! The client-side state machine that folds the progress event stream back
//! into a renderable run state. The reconstructor is a pure fold: no I/O, no
//! clock, no knowledge of the transport. Server-side truth lives with the
//! runner; the session here is a derived, disposable projection rebuilt from
//! scratch on every `start` and discarded when the observer dismisses it.
//!
//! Events that do not fit the expected shape for the current phase (a
//! completion before any `start`, a duplicate index, a counter jumping
//! backwards) are protocol violations: logged and ignored, never fatal.

use serde::Serialize;
use tracing::warn;

use crate::protocol::{OperationOutcome, ProgressEvent, RunSummary};

/// Lifecycle phase of the reconstructed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    /// No run observed, or the last view was dismissed.
    Idle,
    /// A `start` has been observed and no terminal event yet.
    Running,
    /// The terminal `complete` has been observed.
    Complete,
}

/// Read-only view model of one reconstructed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSession {
    /// Current lifecycle phase.
    pub phase: RunPhase,
    /// Operation count announced by the run's `start` event.
    pub total: usize,
    /// Progress counter as last observed; monotonically non-decreasing
    /// within a session.
    pub current: usize,
    /// Most recent display message.
    pub message: String,
    /// Per-operation outcomes in completion order.
    pub outcomes: Vec<OperationOutcome>,
    /// Populated exactly once, by the terminal event.
    pub summary: Option<RunSummary>,
}

impl RunSession {
    fn idle() -> Self {
        Self {
            phase: RunPhase::Idle,
            total: 0,
            current: 0,
            message: String::new(),
            outcomes: Vec::new(),
            summary: None,
        }
    }
}

impl Default for RunSession {
    fn default() -> Self {
        Self::idle()
    }
}

/// Folds progress events into a [`RunSession`].
#[derive(Debug, Default)]
pub struct RunReconstructor {
    session: RunSession,
}

impl RunReconstructor {
    /// A reconstructor in the idle phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> RunPhase {
        self.session.phase
    }

    /// The reconstructed view model.
    pub fn session(&self) -> &RunSession {
        &self.session
    }

    /// Completion percentage, recomputed on every read: `current / total`
    /// when a total is known, `0` otherwise. Never stored.
    pub fn progress_percent(&self) -> f64 {
        if self.session.total > 0 {
            self.session.current as f64 / self.session.total as f64 * 100.0
        } else {
            0.0
        }
    }

    /// Discard the view and return to idle. No state from the dismissed run
    /// survives into the next `start`.
    pub fn dismiss(&mut self) {
        self.session = RunSession::idle();
    }

    /// Fold one event into the session. Events outside the expected
    /// (phase, kind, counter) shape are dropped.
    pub fn apply(&mut self, event: ProgressEvent) {
        match (self.session.phase, event) {
            (RunPhase::Idle | RunPhase::Complete, ProgressEvent::Start { total, message }) => {
                self.session = RunSession {
                    phase: RunPhase::Running,
                    total,
                    current: 0,
                    message,
                    outcomes: Vec::new(),
                    summary: None,
                };
            }
            (RunPhase::Running, ProgressEvent::OperationStart { current, message }) => {
                if current != self.session.outcomes.len() + 1 || current > self.session.total {
                    self.reject("operation_start", current);
                    return;
                }
                self.session.current = current;
                self.session.message = message;
            }
            (
                RunPhase::Running,
                ProgressEvent::OperationComplete {
                    current,
                    operation,
                    success,
                    execution_time_ms,
                    error,
                    message,
                },
            ) => {
                if current != self.session.outcomes.len() + 1 || current > self.session.total {
                    self.reject("operation_complete", current);
                    return;
                }
                self.session.outcomes.push(OperationOutcome {
                    name: operation,
                    success,
                    duration_ms: execution_time_ms,
                    error,
                });
                self.session.current = current;
                self.session.message = message;
            }
            (RunPhase::Running, ProgressEvent::Complete { message, summary }) => {
                if self.session.outcomes.len() != self.session.total {
                    // Render best-effort: the summary is still authoritative
                    // even when earlier events were lost on the channel.
                    warn!(
                        observed = self.session.outcomes.len(),
                        total = self.session.total,
                        "terminal event with incomplete outcome list"
                    );
                }
                self.session.message = message;
                self.session.summary = Some(summary);
                self.session.phase = RunPhase::Complete;
            }
            (phase, event) => {
                warn!(
                    ?phase,
                    kind = event.kind(),
                    "dropping progress event outside protocol shape"
                );
            }
        }
    }

    fn reject(&self, kind: &str, current: usize) {
        warn!(
            kind,
            current,
            expected = self.session.outcomes.len() + 1,
            total = self.session.total,
            "dropping out-of-order progress event"
        );
    }
}
