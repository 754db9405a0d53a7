use std::io;

use serde::{Deserialize, Serialize};

/// Middleware timestamp split into whole seconds and a nanosecond remainder.
///
/// Values pass through the bridge untouched; no wall-clock arithmetic is
/// performed on them.
///
/// # Serialization
///
/// ```
/// use btbridge::message::Timestamp;
///
/// let ts = Timestamp { sec: 5, nanosec: 100 };
/// let json = serde_json::to_string(&ts).unwrap();
/// assert_eq!(json, r#"{"sec":5,"nanosec":100}"#);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Timestamp {
    /// Whole seconds since the middleware's epoch.
    pub sec: i64,
    /// Nanoseconds past `sec`.
    pub nanosec: u32,
}

/// One behavior-tree node's status transition.
///
/// Status strings are opaque to the bridge: whatever the publisher sends
/// (e.g. `IDLE`, `RUNNING`, `SUCCESS`, `FAILURE`) is forwarded verbatim.
///
/// # Examples
///
/// ```
/// use btbridge::message::StatusChange;
///
/// let change = StatusChange::new("Root", "IDLE", "RUNNING");
/// assert_eq!(change.node_name, "Root");
/// assert_eq!(change.current_status, "RUNNING");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusChange {
    /// Name of the behavior-tree node that transitioned.
    pub node_name: String,
    /// Status before the transition.
    pub previous_status: String,
    /// Status after the transition.
    pub current_status: String,
}

impl StatusChange {
    /// Creates a status-change record.
    pub fn new(
        node_name: impl Into<String>,
        previous_status: impl Into<String>,
        current_status: impl Into<String>,
    ) -> Self {
        Self {
            node_name: node_name.into(),
            previous_status: previous_status.into(),
            current_status: current_status.into(),
        }
    }
}

/// One snapshot of all status changes since the previous publish.
///
/// The order of `event_log` reflects the order transitions occurred and is
/// preserved exactly on output. An empty `event_log` still serializes as
/// `"event_log": []`, never as an omitted key.
///
/// # Serialization
///
/// ```
/// use btbridge::message::{BehaviorTreeLog, StatusChange, Timestamp};
///
/// let log = BehaviorTreeLog {
///     timestamp: Timestamp { sec: 5, nanosec: 100 },
///     event_log: vec![StatusChange::new("Root", "IDLE", "RUNNING")],
/// };
/// let line = serde_json::to_string(&log).unwrap();
/// let parsed: BehaviorTreeLog = serde_json::from_str(&line).unwrap();
/// assert_eq!(parsed, log);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BehaviorTreeLog {
    /// Publish time reported by the middleware.
    pub timestamp: Timestamp,
    /// Status transitions in the order they occurred.
    pub event_log: Vec<StatusChange>,
}

impl BehaviorTreeLog {
    /// Creates a log message from a timestamp and an ordered event list.
    pub fn new(timestamp: Timestamp, event_log: Vec<StatusChange>) -> Self {
        Self {
            timestamp,
            event_log,
        }
    }

    /// Renders this message as its single output line (no trailing newline).
    ///
    /// Separators use `", "` and `": "` to stay byte-compatible with the
    /// stream format existing clients already parse.
    ///
    /// ```
    /// use btbridge::message::{BehaviorTreeLog, StatusChange, Timestamp};
    ///
    /// let log = BehaviorTreeLog::new(
    ///     Timestamp { sec: 5, nanosec: 100 },
    ///     vec![StatusChange::new("Root", "IDLE", "RUNNING")],
    /// );
    /// assert_eq!(
    ///     log.to_line().unwrap(),
    ///     r#"{"timestamp": {"sec": 5, "nanosec": 100}, "event_log": [{"node_name": "Root", "previous_status": "IDLE", "current_status": "RUNNING"}]}"#,
    /// );
    /// ```
    pub fn to_line(&self) -> Result<String, serde_json::Error> {
        let mut buf = Vec::with_capacity(128);
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        self.serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// JSON formatter emitting `", "` and `": "` separators.
struct SpacedFormatter;

impl serde_json::ser::Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if !first {
            writer.write_all(b", ")?;
        }
        Ok(())
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}
