//! Progress event protocol
//!
//! The wire contract between the batch runner and its observer: four event
//! kinds carried over the persistent channel, each tagged with a `type`
//! discriminator. The runner emits them in a fixed shape per run: one
//! `start`, one (`operation_start`, `operation_complete`) pair per catalog
//! entry with `current` running `1..=total` in order, and one terminal
//! `complete`. Anything outside that shape is a protocol violation for the
//! observer to log and drop.

use serde::{Deserialize, Serialize};

/// Event name used on the wire channel for all progress payloads.
pub const PROGRESS_EVENT: &str = "progress";

/// Recorded result of one executed operation.
///
/// Appended to the active run in completion order; never removed or
/// reordered. `error` is present iff `success` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// Stable operation name from the catalog.
    pub name: String,
    /// Whether the operation completed without signalling an error.
    pub success: bool,
    /// Elapsed execution time, recorded regardless of outcome.
    pub duration_ms: u64,
    /// Stringified failure cause, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Authoritative per-run summary, computed server-side on the terminal event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of operations executed this run.
    pub total_operations: usize,
    /// Operations that completed without error.
    pub successful: usize,
    /// Operations that signalled an error.
    pub failed: usize,
    /// Sum of all recorded operation durations.
    pub total_time_ms: u64,
}

impl RunSummary {
    /// Invariant check: `successful + failed == total_operations`.
    pub fn is_consistent(&self) -> bool {
        self.successful + self.failed == self.total_operations
    }
}

/// One message in the four-kind run lifecycle protocol.
///
/// Serialized as a record with a `type` discriminator (`start` |
/// `operation_start` | `operation_complete` | `complete`) plus the
/// kind-specific fields. Every kind carries a human-readable `message`
/// for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    /// Emitted immediately before the first operation of a run begins.
    Start {
        /// Count of catalog entries this run will execute.
        total: usize,
        /// Display text.
        message: String,
    },
    /// Emitted immediately before each operation's invocation.
    OperationStart {
        /// 1-based index of the operation about to run.
        current: usize,
        /// Display text.
        message: String,
    },
    /// Emitted immediately after each operation finishes, success or failure.
    OperationComplete {
        /// Count of operations completed so far, including this one.
        current: usize,
        /// Stable operation name.
        operation: String,
        /// Whether the operation succeeded.
        success: bool,
        /// Elapsed execution time for this operation.
        execution_time_ms: u64,
        /// Stringified failure cause, absent on success.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        /// Display text.
        message: String,
    },
    /// Emitted once, after the last `operation_complete`, never before.
    Complete {
        /// Display text.
        message: String,
        /// The authoritative run summary.
        summary: RunSummary,
    },
}

impl ProgressEvent {
    /// The wire discriminator for this event kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ProgressEvent::Start { .. } => "start",
            ProgressEvent::OperationStart { .. } => "operation_start",
            ProgressEvent::OperationComplete { .. } => "operation_complete",
            ProgressEvent::Complete { .. } => "complete",
        }
    }
}
