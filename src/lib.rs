//! # Runstream
//!
//! Batch execution and progress streaming for a document-store operation
//! dashboard: a server-side runner that executes a fixed operation catalog
//! sequentially, a four-kind progress event protocol, and a client-side
//! state machine that reconstructs run state purely from the event stream.
//!
//! ## Overview
//!
//! A run is triggered once and then observed: the runner pushes lifecycle
//! events onto a persistent channel as each operation completes, tolerating
//! and recording per-operation failure without ever aborting the batch. The
//! observer folds whatever events arrive into a disposable view model;
//! a client attaching mid-run renders best-effort from the partial stream.
//!
//! ## Quick Start
//!
//! ```rust
//! use runstream::protocol::{ProgressEvent, RunSummary};
//! use runstream::session::{RunPhase, RunReconstructor};
//!
//! let mut view = RunReconstructor::new();
//! view.apply(ProgressEvent::Start { total: 1, message: "starting".into() });
//! view.apply(ProgressEvent::OperationStart { current: 1, message: "insert_one".into() });
//! view.apply(ProgressEvent::OperationComplete {
//!     current: 1,
//!     operation: "insert_one".into(),
//!     success: true,
//!     execution_time_ms: 12,
//!     error: None,
//!     message: "done".into(),
//! });
//! view.apply(ProgressEvent::Complete {
//!     message: "done".into(),
//!     summary: RunSummary {
//!         total_operations: 1,
//!         successful: 1,
//!         failed: 0,
//!         total_time_ms: 12,
//!     },
//! });
//! assert_eq!(view.phase(), RunPhase::Complete);
//! assert_eq!(view.progress_percent(), 100.0);
//! ```
//!
//! ## Modules
//!
//! - [`catalog`]: the closed, ordered set of document-store operations
//! - [`store`]: the document store collaborator seam and in-memory stand-in
//! - [`runner`]: sequential batch execution with per-operation outcomes
//! - [`protocol`]: the four-kind progress event wire contract
//! - [`channel`]: the injected progress channel with explicit lifecycle
//! - [`session`]: run state reconstruction from the event stream
//! - [`gate`]: two-step confirmation in front of costly actions
//! - [`notify`]: transient notification queue

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

use thiserror::Error;

/// Result type for runstream operations.
pub type Result<T> = std::result::Result<T, RunstreamError>;

/// Main error type composing the per-seam errors.
#[derive(Error, Debug)]
pub enum RunstreamError {
    /// Document store error.
    #[error("Store error: {0}")]
    Store(#[from] store::StoreError),

    /// Batch trigger error.
    #[error("Runner error: {0}")]
    Runner(#[from] runner::RunnerError),

    /// Event channel transport error.
    #[error("Channel error: {0}")]
    Channel(#[from] channel::ChannelError),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Join error from async tasks.
    #[error("Async join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Operation catalog: the closed set of operations and their fixed arguments.
pub mod catalog;

/// Document store collaborator seam.
pub mod store;

/// Sequential batch runner.
pub mod runner;

/// Progress event protocol.
pub mod protocol;

/// Progress channel with explicit lifecycle.
pub mod channel;

/// Run state reconstruction.
pub mod session;

/// Confirmation gate for costly actions.
pub mod gate;

/// Transient notification queue.
pub mod notify;
