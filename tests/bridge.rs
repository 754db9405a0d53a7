use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use btbridge::bridge::{Bridge, MemorySink, RecordSink};
use btbridge::message::{BehaviorTreeLog, StatusChange, Timestamp};
use btbridge::transport::LocalTransport;

fn log_at(sec: i64, event_log: Vec<StatusChange>) -> BehaviorTreeLog {
    BehaviorTreeLog::new(Timestamp { sec, nanosec: 0 }, event_log)
}

/// Sink that fails its first emit and delegates to a MemorySink afterwards.
#[derive(Clone)]
struct FailOnce {
    inner: MemorySink,
    tripped: Arc<AtomicBool>,
}

impl FailOnce {
    fn new(inner: MemorySink) -> Self {
        Self {
            inner,
            tripped: Arc::new(AtomicBool::new(false)),
        }
    }
}

impl RecordSink for FailOnce {
    fn emit(&mut self, line: &str) -> io::Result<()> {
        if !self.tripped.swap(true, Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "simulated sink failure",
            ));
        }
        self.inner.emit(line)
    }
}

#[test]
fn example_message_produces_reference_line() {
    let transport = LocalTransport::new();
    let subscription = transport.subscribe("/behavior_tree_log", 10);
    let publisher = transport.publisher("/behavior_tree_log");

    let sink = MemorySink::new();
    let mut bridge = Bridge::new(subscription, sink.clone());

    publisher.publish(BehaviorTreeLog::new(
        Timestamp {
            sec: 5,
            nanosec: 100,
        },
        vec![StatusChange::new("Root", "IDLE", "RUNNING")],
    ));
    assert_eq!(bridge.drain(), 1);

    assert_eq!(
        sink.snapshot(),
        vec![
            r#"{"timestamp": {"sec": 5, "nanosec": 100}, "event_log": [{"node_name": "Root", "previous_status": "IDLE", "current_status": "RUNNING"}]}"#
                .to_string()
        ],
    );
}

#[tokio::test]
async fn one_line_per_message_in_arrival_order() {
    let transport = LocalTransport::new();
    let subscription = transport.subscribe("/behavior_tree_log", 16);
    let publisher = transport.publisher("/behavior_tree_log");

    for sec in 0..5 {
        publisher.publish(log_at(sec, vec![StatusChange::new("Root", "IDLE", "RUNNING")]));
    }
    // Dropping every producer closes the queue; run() drains what is
    // buffered and then stops.
    drop(publisher);
    drop(transport);

    let sink = MemorySink::new();
    let mut bridge = Bridge::new(subscription, sink.clone());
    let emitted = bridge.run(std::future::pending::<()>()).await;

    assert_eq!(emitted, 5);
    let secs: Vec<i64> = sink
        .snapshot()
        .iter()
        .map(|line| {
            let parsed: BehaviorTreeLog = serde_json::from_str(line).expect("valid JSON line");
            parsed.timestamp.sec
        })
        .collect();
    assert_eq!(secs, vec![0, 1, 2, 3, 4]);
}

#[test]
fn event_log_order_is_preserved() {
    let sink = MemorySink::new();
    let transport = LocalTransport::new();
    let mut bridge = Bridge::new(transport.subscribe("/behavior_tree_log", 10), sink.clone());

    let message = log_at(
        1,
        vec![
            StatusChange::new("A", "IDLE", "RUNNING"),
            StatusChange::new("B", "RUNNING", "SUCCESS"),
            StatusChange::new("C", "SUCCESS", "IDLE"),
        ],
    );
    bridge.emit(&message).expect("emit");

    let parsed: BehaviorTreeLog = serde_json::from_str(&sink.snapshot()[0]).expect("valid JSON");
    let names: Vec<&str> = parsed
        .event_log
        .iter()
        .map(|change| change.node_name.as_str())
        .collect();
    assert_eq!(names, vec!["A", "B", "C"]);
}

#[test]
fn empty_event_log_keeps_the_key() {
    let sink = MemorySink::new();
    let transport = LocalTransport::new();
    let mut bridge = Bridge::new(transport.subscribe("/behavior_tree_log", 10), sink.clone());

    bridge.emit(&log_at(7, vec![])).expect("emit");

    let line = &sink.snapshot()[0];
    assert!(line.contains(r#""event_log": []"#), "got: {line}");
    let parsed: BehaviorTreeLog = serde_json::from_str(line).expect("valid JSON");
    assert!(parsed.event_log.is_empty());
}

#[test]
fn emit_failure_drops_one_message_and_stream_continues() {
    let transport = LocalTransport::new();
    let subscription = transport.subscribe("/behavior_tree_log", 10);
    let publisher = transport.publisher("/behavior_tree_log");

    let captured = MemorySink::new();
    let mut bridge = Bridge::new(subscription, FailOnce::new(captured.clone()));

    publisher.publish(log_at(1, vec![StatusChange::new("A", "IDLE", "RUNNING")]));
    publisher.publish(log_at(2, vec![StatusChange::new("B", "IDLE", "RUNNING")]));
    let emitted = bridge.drain();

    // First message hit the failing sink and was dropped; second came
    // through untouched.
    assert_eq!(emitted, 1);
    let lines = captured.snapshot();
    assert_eq!(lines.len(), 1);
    let parsed: BehaviorTreeLog = serde_json::from_str(&lines[0]).expect("valid JSON");
    assert_eq!(parsed.timestamp.sec, 2);
    assert_eq!(parsed.event_log[0].node_name, "B");
}

#[test]
fn subscription_targets_the_configured_topic() {
    let transport = LocalTransport::new();
    let subscription = transport.subscribe("/custom/tree_log", 10);
    assert_eq!(subscription.topic(), "/custom/tree_log");

    let default_publisher = transport.publisher("/behavior_tree_log");
    let custom_publisher = transport.publisher("/custom/tree_log");

    assert_eq!(default_publisher.publish(log_at(1, vec![])), 0);
    assert_eq!(custom_publisher.publish(log_at(2, vec![])), 1);

    let sink = MemorySink::new();
    let mut bridge = Bridge::new(subscription, sink.clone());
    assert_eq!(bridge.topic(), "/custom/tree_log");
    assert_eq!(bridge.drain(), 1);
    let parsed: BehaviorTreeLog =
        serde_json::from_str(&sink.snapshot()[0]).expect("valid JSON");
    assert_eq!(parsed.timestamp.sec, 2);
}

#[tokio::test]
async fn shutdown_future_stops_the_loop() {
    let transport = LocalTransport::new();
    let subscription = transport.subscribe("/behavior_tree_log", 10);
    let publisher = transport.publisher("/behavior_tree_log");

    let sink = MemorySink::new();
    let mut bridge = Bridge::new(subscription, sink.clone());

    publisher.publish(log_at(1, vec![]));
    bridge.drain();

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    stop_tx.send(()).expect("receiver alive");
    let emitted = bridge
        .run(async {
            let _ = stop_rx.await;
        })
        .await;

    assert_eq!(emitted, 1);
}
