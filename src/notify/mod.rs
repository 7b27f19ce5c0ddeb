//! Notification sink
//!
//! Process-local queue of transient messages surfacing terminal outcomes.
//! Messages render in insertion order, each expires independently after a
//! fixed display window, and an explicit dismissal removes one early.
//! Identity is a monotonically increasing counter, never a wall-clock
//! timestamp: two messages created within the same clock tick must still
//! be distinct. Expiry is driven by a caller-supplied instant so the sink
//! itself never reads a clock.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;

/// How long each message stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

/// Severity of a transient message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Terminal success.
    Success,
    /// Terminal failure.
    Error,
    /// Degraded but not failed.
    Warning,
    /// Neutral information.
    Info,
}

/// One queued transient message.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Unique identity within the process.
    pub id: u64,
    /// Display severity.
    pub severity: Severity,
    /// Display text.
    pub text: String,
    /// Wall-clock creation time, for display only.
    pub created_at: DateTime<Utc>,
    deadline: Instant,
}

impl Notification {
    /// When this message stops being visible.
    pub fn expires_at(&self) -> Instant {
        self.deadline
    }
}

/// Ordered queue of transient messages.
#[derive(Debug, Default)]
pub struct NotificationSink {
    next_id: AtomicU64,
    queue: Mutex<Vec<Notification>>,
}

impl NotificationSink {
    /// An empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message created at `now`; it expires [`NOTIFICATION_TTL`]
    /// later, independent of every other message's timer. Returns the
    /// message identity for early dismissal.
    pub fn push(&self, severity: Severity, text: impl Into<String>, now: Instant) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let notification = Notification {
            id,
            severity,
            text: text.into(),
            created_at: Utc::now(),
            deadline: now + NOTIFICATION_TTL,
        };
        self.queue.lock().push(notification);
        id
    }

    /// Remove a message before its window elapses. Returns whether the id
    /// was still queued.
    pub fn dismiss(&self, id: u64) -> bool {
        let mut queue = self.queue.lock();
        let before = queue.len();
        queue.retain(|n| n.id != id);
        queue.len() != before
    }

    /// Messages still visible at `now`, in insertion order. Expired entries
    /// are purged as a side effect.
    pub fn visible(&self, now: Instant) -> Vec<Notification> {
        let mut queue = self.queue.lock();
        queue.retain(|n| n.deadline > now);
        queue.clone()
    }
}
