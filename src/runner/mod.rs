//! Batch runner
//!
//! Executes the full operation catalog sequentially against the document
//! store, once per trigger. Each operation is timed and classified as
//! success or failure; a failure is recorded and never aborts the batch.
//! Lifecycle events travel only through the progress sink; the
//! [`RunReport`] return value exists for the trigger endpoint's final tally.
//!
//! Operations run strictly one at a time so trace spans stay attributable
//! to a single operation and the protocol's `current` counter is
//! unambiguous.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::catalog::{Catalog, OperationSpec};
use crate::channel::EventSink;
use crate::protocol::{OperationOutcome, ProgressEvent, RunSummary};
use crate::store::DocumentStore;

/// Errors that prevent a run from starting. Once a run has started it always
/// runs to completion; per-operation failures are recorded, not raised.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// A batch run is already in flight; concurrent triggers are rejected.
    #[error("A batch run is already in flight")]
    AlreadyRunning,
}

/// Final tally of one completed run.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier attached to this run's trace spans.
    pub run_id: Uuid,
    /// The authoritative summary, identical to the terminal event's.
    pub summary: RunSummary,
    /// Per-operation outcomes in catalog order.
    pub outcomes: Vec<OperationOutcome>,
}

/// Sequential batch runner over a fixed operation catalog.
pub struct BatchRunner {
    store: Arc<dyn DocumentStore>,
    catalog: Catalog,
    sink: Arc<dyn EventSink>,
    timeout: Option<Duration>,
    clear_before_run: bool,
    in_flight: AtomicBool,
}

impl BatchRunner {
    /// Create a runner over `catalog`, executing against `store` and
    /// reporting progress into `sink`.
    pub fn new(store: Arc<dyn DocumentStore>, catalog: Catalog, sink: Arc<dyn EventSink>) -> Self {
        Self {
            store,
            catalog,
            sink,
            timeout: None,
            clear_before_run: true,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Impose a per-operation timeout. A timed-out operation is recorded as
    /// a failure and the batch continues; without a timeout a hung operation
    /// stalls the run indefinitely.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Control whether the collection is cleared before each run. On by
    /// default; a failed clear is logged and the run proceeds.
    pub fn with_clear_before_run(mut self, clear: bool) -> Self {
        self.clear_before_run = clear;
        self
    }

    /// Whether a run is currently in flight.
    pub fn is_running(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Execute every catalog operation in order, exactly once each.
    ///
    /// Returns only after the last operation has completed and the terminal
    /// `complete` event has been emitted. A second trigger while a run is in
    /// flight is rejected with [`RunnerError::AlreadyRunning`].
    #[instrument(skip(self), fields(total = self.catalog.len()))]
    pub async fn run_all(&self) -> Result<RunReport, RunnerError> {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            return Err(RunnerError::AlreadyRunning);
        }
        let _guard = InFlightGuard { flag: &self.in_flight };
        Ok(self.execute().await)
    }

    async fn execute(&self) -> RunReport {
        let run_id = Uuid::new_v4();
        let total = self.catalog.len();
        info!(%run_id, total, "starting batch run");

        if self.clear_before_run {
            match self.store.clear().await {
                Ok(removed) => debug!(%run_id, removed, "cleared collection before run"),
                Err(e) => warn!(%run_id, error = %e, "pre-run clear failed; continuing"),
            }
        }

        self.sink.emit(&ProgressEvent::Start {
            total,
            message: format!("Starting sequential execution of {} operations...", total),
        });

        let mut outcomes: Vec<OperationOutcome> = Vec::with_capacity(total);
        for (index, spec) in self.catalog.iter().enumerate() {
            let current = index + 1;
            self.sink.emit(&ProgressEvent::OperationStart {
                current,
                message: format!("Executing {}...", spec.name()),
            });
            debug!(
                %run_id,
                current,
                operation = spec.name(),
                category = ?spec.kind().category(),
                deprecated = spec.kind().is_deprecated(),
                "invoking operation"
            );

            let outcome = self.execute_one(spec).await;
            if outcome.success {
                info!(
                    %run_id,
                    operation = %outcome.name,
                    duration_ms = outcome.duration_ms,
                    "operation completed"
                );
            } else {
                warn!(
                    %run_id,
                    operation = %outcome.name,
                    duration_ms = outcome.duration_ms,
                    error = outcome.error.as_deref().unwrap_or(""),
                    "operation failed"
                );
            }

            self.sink.emit(&ProgressEvent::OperationComplete {
                current,
                operation: outcome.name.clone(),
                success: outcome.success,
                execution_time_ms: outcome.duration_ms,
                error: outcome.error.clone(),
                message: completion_message(&outcome),
            });
            outcomes.push(outcome);
        }

        let successful = outcomes.iter().filter(|o| o.success).count();
        let failed = total - successful;
        let total_time_ms = outcomes.iter().map(|o| o.duration_ms).sum();
        let summary = RunSummary {
            total_operations: total,
            successful,
            failed,
            total_time_ms,
        };
        info!(
            %run_id,
            successful,
            failed,
            total_time_ms,
            "batch run completed"
        );

        self.sink.emit(&ProgressEvent::Complete {
            message: format!(
                "Completed! {}/{} operations succeeded in {}ms",
                successful, total, total_time_ms
            ),
            summary: summary.clone(),
        });

        RunReport {
            run_id,
            summary,
            outcomes,
        }
    }

    async fn execute_one(&self, spec: &OperationSpec) -> OperationOutcome {
        let started = Instant::now();
        let invocation = self.store.execute(spec.kind(), spec.payload());
        let result: Result<(), String> = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, invocation).await {
                Ok(result) => result.map(|_| ()).map_err(|e| e.to_string()),
                Err(_) => Err(format!("timed out after {}ms", limit.as_millis())),
            },
            None => invocation.await.map(|_| ()).map_err(|e| e.to_string()),
        };
        let duration_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(()) => OperationOutcome {
                name: spec.name().to_string(),
                success: true,
                duration_ms,
                error: None,
            },
            Err(error) => OperationOutcome {
                name: spec.name().to_string(),
                success: false,
                duration_ms,
                error: Some(error),
            },
        }
    }
}

/// Releases the in-flight flag even if the run future is dropped mid-way.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

fn completion_message(outcome: &OperationOutcome) -> String {
    if outcome.success {
        format!("✓ {} completed in {}ms", outcome.name, outcome.duration_ms)
    } else {
        let error: String = outcome
            .error
            .as_deref()
            .unwrap_or("unknown error")
            .chars()
            .take(50)
            .collect();
        format!("✗ {} failed: {}", outcome.name, error)
    }
}
