//! Progress channel
//!
//! The persistent duplex channel between the batch runner and its observer,
//! modelled as an explicitly injected handle rather than ambient connection
//! state. The sender side is an [`EventSink`]; the observer side is a
//! [`ProgressFeed`] obtained from [`ProgressChannel::connect`] and released
//! deterministically when dropped.
//!
//! Delivery semantics are deliberately weak: no acknowledgment, no sequence
//! numbers, no replay buffer. An event emitted while no observer is attached
//! is lost, and an observer that attaches mid-run only sees events that
//! arrive afterwards.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::{Stream, StreamExt};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, error, warn};

use crate::protocol::ProgressEvent;

/// Errors surfaced by the channel transport.
#[derive(Error, Debug)]
pub enum ChannelError {
    /// A payload arrived that is not a well-formed progress event.
    #[error("Failed to decode progress event: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Anything the runner can push progress events into.
///
/// Emission is fire-and-forget: a sink never blocks the runner and never
/// reports delivery failure back to it.
pub trait EventSink: Send + Sync {
    /// Push one event toward whatever observer may be attached.
    fn emit(&self, event: &ProgressEvent);
}

/// Sink for runs nobody watches. Every event is discarded.
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &ProgressEvent) {}
}

/// Decode one wire payload into a progress event.
pub fn decode(payload: &str) -> Result<ProgressEvent, ChannelError> {
    serde_json::from_str(payload).map_err(ChannelError::Decode)
}

/// The duplex progress channel. Events cross it serialized as the protocol's
/// JSON records under the `progress` event name.
pub struct ProgressChannel {
    tx: broadcast::Sender<String>,
}

impl ProgressChannel {
    /// Create a channel able to buffer `capacity` undelivered events per
    /// observer before old ones are discarded.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Attach an observer. The returned feed yields events emitted from this
    /// point on; dropping it detaches the observer.
    pub fn connect(&self) -> ProgressFeed {
        ProgressFeed {
            inner: BroadcastStream::new(self.tx.subscribe()),
        }
    }

    /// Number of currently attached observers.
    pub fn observer_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl EventSink for ProgressChannel {
    fn emit(&self, event: &ProgressEvent) {
        let payload = match serde_json::to_string(event) {
            Ok(payload) => payload,
            Err(e) => {
                error!(kind = event.kind(), error = %e, "failed to encode progress event");
                return;
            }
        };
        if self.tx.send(payload).is_err() {
            // No observer attached; the event is lost by design.
            debug!(kind = event.kind(), "progress event dropped, no observer");
        }
    }
}

/// One observer's view of the event stream.
///
/// Undecodable payloads and gaps from lagging behind the channel capacity are
/// logged and skipped; the stream ends when the channel is closed.
pub struct ProgressFeed {
    inner: BroadcastStream<String>,
}

impl ProgressFeed {
    /// Receive the next decodable event, or `None` once the channel closes.
    pub async fn next_event(&mut self) -> Option<ProgressEvent> {
        self.next().await
    }

    /// Detach from the channel. Dropping the feed has the same effect; this
    /// exists so view teardown reads as an explicit lifecycle step.
    pub fn disconnect(self) {}
}

impl Stream for ProgressFeed {
    type Item = ProgressEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(payload))) => match decode(&payload) {
                    Ok(event) => return Poll::Ready(Some(event)),
                    Err(e) => {
                        warn!(error = %e, "discarding undecodable progress payload");
                    }
                },
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(missed)))) => {
                    warn!(missed, "progress feed lagged; events were lost");
                }
                Poll::Ready(None) => return Poll::Ready(None),
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}
