use btbridge::message::{BehaviorTreeLog, StatusChange, Timestamp};
use proptest::prelude::*;

#[test]
fn parsed_line_equals_the_input_message() {
    let message = BehaviorTreeLog::new(
        Timestamp {
            sec: 1_700_000_000,
            nanosec: 999_999_999,
        },
        vec![
            StatusChange::new("NavigateRecovery", "IDLE", "RUNNING"),
            StatusChange::new("PipelineSequence", "IDLE", "RUNNING"),
        ],
    );

    let line = message.to_line().expect("encode");
    let parsed: BehaviorTreeLog = serde_json::from_str(&line).expect("decode");
    assert_eq!(parsed, message);
}

#[test]
fn negative_and_extreme_timestamps_survive_exactly() {
    for (sec, nanosec) in [(i64::MIN, 0u32), (i64::MAX, u32::MAX), (-1, 1)] {
        let message = BehaviorTreeLog::new(Timestamp { sec, nanosec }, vec![]);
        let parsed: BehaviorTreeLog =
            serde_json::from_str(&message.to_line().expect("encode")).expect("decode");
        assert_eq!(parsed.timestamp.sec, sec);
        assert_eq!(parsed.timestamp.nanosec, nanosec);
    }
}

fn status_change_strategy() -> impl Strategy<Value = StatusChange> {
    (".*", ".*", ".*").prop_map(|(node_name, previous_status, current_status)| StatusChange {
        node_name,
        previous_status,
        current_status,
    })
}

proptest! {
    #[test]
    fn any_message_round_trips_with_order_and_length(
        sec in any::<i64>(),
        nanosec in any::<u32>(),
        event_log in prop::collection::vec(status_change_strategy(), 0..8),
    ) {
        let message = BehaviorTreeLog::new(Timestamp { sec, nanosec }, event_log);
        let line = message.to_line().expect("encode");
        let parsed: BehaviorTreeLog = serde_json::from_str(&line).expect("decode");
        prop_assert_eq!(parsed.event_log.len(), message.event_log.len());
        prop_assert_eq!(parsed, message);
    }
}
