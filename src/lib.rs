//! # btbridge: Behavior-Tree Log to NDJSON Bridge
//!
//! Subscribes to one middleware topic carrying behavior-tree execution
//! events and emits each received message as a single JSON line on stdout,
//! flushed immediately, for consumption by an external visualization client.
//!
//! ## Core pieces
//!
//! - [`message`]: the wire schema (`BehaviorTreeLog` and friends)
//! - [`transport`]: subscription delivery over a bounded queue, with a
//!   Unix-socket production path and an in-process path for tests
//! - [`bridge`]: the per-message loop projecting messages onto a
//!   [`bridge::RecordSink`]
//! - [`config`]: topic, queue depth, and endpoint resolution from the
//!   environment
//!
//! ## Quick start
//!
//! ```
//! use btbridge::bridge::{Bridge, MemorySink};
//! use btbridge::message::{BehaviorTreeLog, StatusChange, Timestamp};
//! use btbridge::transport::LocalTransport;
//!
//! let transport = LocalTransport::new();
//! let subscription = transport.subscribe("/behavior_tree_log", 10);
//! let publisher = transport.publisher("/behavior_tree_log");
//!
//! let sink = MemorySink::new();
//! let mut bridge = Bridge::new(subscription, sink.clone());
//!
//! publisher.publish(BehaviorTreeLog::new(
//!     Timestamp { sec: 5, nanosec: 100 },
//!     vec![StatusChange::new("Root", "IDLE", "RUNNING")],
//! ));
//! bridge.drain();
//!
//! assert_eq!(
//!     sink.snapshot()[0],
//!     r#"{"timestamp": {"sec": 5, "nanosec": 100}, "event_log": [{"node_name": "Root", "previous_status": "IDLE", "current_status": "RUNNING"}]}"#,
//! );
//! ```
//!
//! Every received message produces exactly one output line, or zero if
//! serialization or the sink write fails; failures never merge messages or
//! stop the stream.

pub mod bridge;
pub mod config;
pub mod errors;
pub mod message;
pub mod telemetry;
pub mod transport;

pub use bridge::{Bridge, MemorySink, RecordSink, StdoutSink};
pub use config::BridgeConfig;
pub use errors::{EmitError, TransportError};
pub use message::{BehaviorTreeLog, StatusChange, Timestamp};
pub use transport::{LocalTransport, SocketTransport, Subscription};
