//! Transport layer: acquiring the middleware connection and delivering
//! topic messages over a bounded queue.
//!
//! Two implementations share the [`Subscription`] currency type:
//! [`SocketTransport`] reads newline-delimited JSON from a middleware
//! forwarding endpoint, and [`LocalTransport`] routes in-process publishes
//! for tests and embedders. Both honor the same queue semantics: bounded
//! depth, arrival order, drop-newest on overflow.

pub mod endpoint;
pub mod local;
pub mod socket;

pub use endpoint::EnvDiagnostics;
pub use local::{LocalTransport, Publisher};
pub use socket::SocketTransport;

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::message::BehaviorTreeLog;

/// A live subscription to one topic.
///
/// Messages arrive in publish order through a bounded queue; the consumer
/// drains them one at a time, so no two deliveries overlap. When the queue
/// is full the transport drops the newest message and counts it.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    receiver: flume::Receiver<BehaviorTreeLog>,
    dropped: Arc<AtomicUsize>,
}

impl Subscription {
    /// Creates a bounded queue pair for `topic` with the given depth.
    pub(crate) fn channel(topic: impl Into<String>, depth: usize) -> (QueueSender, Subscription) {
        let topic = topic.into();
        let (tx, rx) = flume::bounded(depth.max(1));
        let dropped = Arc::new(AtomicUsize::new(0));
        let sender = QueueSender {
            topic: topic.clone(),
            sender: tx,
            dropped: Arc::clone(&dropped),
        };
        let subscription = Subscription {
            topic,
            receiver: rx,
            dropped,
        };
        (sender, subscription)
    }

    /// Topic this subscription targets.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Receives the next message, waiting until one arrives.
    ///
    /// Returns `None` once the transport side has shut down and the queue
    /// is drained.
    pub async fn recv(&mut self) -> Option<BehaviorTreeLog> {
        self.receiver.recv_async().await.ok()
    }

    /// Non-blocking receive for tests and drain loops.
    pub fn try_recv(&mut self) -> Option<BehaviorTreeLog> {
        self.receiver.try_recv().ok()
    }

    /// Messages dropped so far because the queue was full.
    pub fn dropped(&self) -> usize {
        self.dropped.load(Ordering::Relaxed)
    }
}

/// Producer side of a subscription queue.
///
/// Shared by both transports; enforces the drop-newest overflow policy.
#[derive(Clone, Debug)]
pub(crate) struct QueueSender {
    topic: String,
    sender: flume::Sender<BehaviorTreeLog>,
    dropped: Arc<AtomicUsize>,
}

impl QueueSender {
    /// Enqueues a message, dropping it if the queue is full.
    ///
    /// Returns `false` once the subscriber side is gone.
    pub(crate) fn deliver(&self, message: BehaviorTreeLog) -> bool {
        match self.sender.try_send(message) {
            Ok(()) => true,
            Err(flume::TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(topic = %self.topic, "delivery queue full, dropping message");
                true
            }
            Err(flume::TrySendError::Disconnected(_)) => false,
        }
    }
}
