use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{QueueSender, Subscription};
use crate::message::BehaviorTreeLog;

/// In-process transport backed by a topic registry.
///
/// Used by tests and embedders that want to drive the bridge without a
/// middleware endpoint. Queue semantics match the socket transport: bounded
/// depth per subscription, arrival order, drop-newest on overflow.
///
/// # Example
///
/// ```
/// use btbridge::message::{BehaviorTreeLog, Timestamp};
/// use btbridge::transport::LocalTransport;
///
/// let transport = LocalTransport::new();
/// let mut sub = transport.subscribe("/behavior_tree_log", 10);
/// let publisher = transport.publisher("/behavior_tree_log");
///
/// publisher.publish(BehaviorTreeLog::new(Timestamp { sec: 1, nanosec: 0 }, vec![]));
/// assert!(sub.try_recv().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct LocalTransport {
    topics: Arc<Mutex<HashMap<String, Vec<QueueSender>>>>,
}

impl LocalTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a bounded subscription on `topic`.
    pub fn subscribe(&self, topic: impl Into<String>, depth: usize) -> Subscription {
        let topic = topic.into();
        let (sender, subscription) = Subscription::channel(topic.clone(), depth);
        self.topics
            .lock()
            .expect("topic registry poisoned")
            .entry(topic)
            .or_default()
            .push(sender);
        subscription
    }

    /// Returns a publish handle for `topic`.
    pub fn publisher(&self, topic: impl Into<String>) -> Publisher {
        Publisher {
            topic: topic.into(),
            topics: Arc::clone(&self.topics),
        }
    }
}

/// Publish handle routing messages to every live subscription on one topic.
#[derive(Clone, Debug)]
pub struct Publisher {
    topic: String,
    topics: Arc<Mutex<HashMap<String, Vec<QueueSender>>>>,
}

impl Publisher {
    /// Delivers `message` to all current subscribers of the topic.
    ///
    /// Returns the number of subscriptions the message reached. Dead
    /// subscriptions are pruned as a side effect.
    pub fn publish(&self, message: BehaviorTreeLog) -> usize {
        let mut registry = self.topics.lock().expect("topic registry poisoned");
        let Some(senders) = registry.get_mut(&self.topic) else {
            return 0;
        };
        let mut reached = 0;
        senders.retain(|sender| {
            let alive = sender.deliver(message.clone());
            if alive {
                reached += 1;
            }
            alive
        });
        reached
    }

    /// Topic this handle publishes to.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}
