//! Document store collaborator seam
//!
//! The batch runner treats every catalog entry uniformly: a kind plus a fixed
//! payload goes in, a JSON result or an error comes out. What actually talks
//! to a database lives behind [`DocumentStore`]; this crate ships only the
//! in-memory stand-in used by tests and the demo.

mod memory;

pub use memory::MemoryStore;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::OperationKind;

/// Errors signalled by a document store implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The server does not support this operation.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// A named index does not exist.
    #[error("Index not found: {0}")]
    IndexNotFound(String),

    /// The operation payload is missing a required field or is malformed.
    #[error("Invalid payload for {operation}: {reason}")]
    InvalidPayload {
        /// Operation name.
        operation: String,
        /// What was wrong with the payload.
        reason: String,
    },

    /// The backing resource cannot be reached.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// A document store executing single opaque units of work.
///
/// Implementations must be safe to call from concurrent ad-hoc requests;
/// the batch runner itself issues at most one call at a time.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Execute one operation with its fixed arguments.
    async fn execute(&self, kind: OperationKind, payload: &Value) -> Result<Value, StoreError>;

    /// Remove every document from the active collection, returning the
    /// number removed.
    async fn clear(&self) -> Result<u64, StoreError>;
}
