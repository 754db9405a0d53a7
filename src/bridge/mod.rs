//! The bridge loop: drain one subscription, emit one JSON line per message.

pub mod sink;

pub use sink::{MemorySink, RecordSink, StdoutSink};

use std::future::Future;

use tracing::{debug, error};

use crate::errors::EmitError;
use crate::message::BehaviorTreeLog;
use crate::transport::Subscription;

/// Drains a [`Subscription`] and projects each message to one JSON line on
/// the sink.
///
/// The loop is stateless across messages: every invocation serializes its
/// own input and writes immediately. A failed emit is logged at error level
/// and the message is dropped; the next message is unaffected.
///
/// # Example
///
/// ```
/// use btbridge::bridge::{Bridge, MemorySink};
/// use btbridge::message::{BehaviorTreeLog, StatusChange, Timestamp};
/// use btbridge::transport::LocalTransport;
///
/// let transport = LocalTransport::new();
/// let subscription = transport.subscribe("/behavior_tree_log", 10);
/// let publisher = transport.publisher("/behavior_tree_log");
///
/// let sink = MemorySink::new();
/// let mut bridge = Bridge::new(subscription, sink.clone());
///
/// publisher.publish(BehaviorTreeLog::new(
///     Timestamp { sec: 5, nanosec: 100 },
///     vec![StatusChange::new("Root", "IDLE", "RUNNING")],
/// ));
/// bridge.drain();
///
/// assert_eq!(sink.snapshot().len(), 1);
/// ```
pub struct Bridge<S: RecordSink> {
    subscription: Subscription,
    sink: S,
    emitted: usize,
}

impl<S: RecordSink> Bridge<S> {
    pub fn new(subscription: Subscription, sink: S) -> Self {
        Self {
            subscription,
            sink,
            emitted: 0,
        }
    }

    /// Topic the underlying subscription targets.
    pub fn topic(&self) -> &str {
        self.subscription.topic()
    }

    /// Lines successfully emitted so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Serializes one message and writes it to the sink.
    pub fn emit(&mut self, message: &BehaviorTreeLog) -> Result<(), EmitError> {
        let line = message.to_line()?;
        self.sink.emit(&line)?;
        Ok(())
    }

    /// Runs until `shutdown` resolves or the transport closes the stream.
    ///
    /// Messages are processed one at a time in arrival order; no two
    /// deliveries overlap. Returns the total number of lines emitted.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) -> usize {
        tokio::pin!(shutdown);
        loop {
            let next = tokio::select! {
                _ = &mut shutdown => break,
                next = self.subscription.recv() => next,
            };
            match next {
                Some(message) => self.dispatch(message),
                None => {
                    debug!(topic = %self.subscription.topic(), "subscription closed, stopping");
                    break;
                }
            }
        }
        self.emitted
    }

    /// Drains messages already queued, then returns without waiting.
    ///
    /// Test convenience: lets callers assert on output without racing the
    /// publisher.
    pub fn drain(&mut self) -> usize {
        while let Some(message) = self.subscription.try_recv() {
            self.dispatch(message);
        }
        self.emitted
    }

    fn dispatch(&mut self, message: BehaviorTreeLog) {
        match self.emit(&message) {
            Ok(()) => self.emitted += 1,
            Err(error) => {
                // One malformed message must never stop the stream.
                error!(
                    sec = message.timestamp.sec,
                    nanosec = message.timestamp.nanosec,
                    %error,
                    "failed to emit record, dropping message"
                );
            }
        }
    }
}
