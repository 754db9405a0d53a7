use std::io::{self, Result as IoResult, Stdout, Write};
use std::sync::{Arc, Mutex};

/// Abstraction over the output target that consumes finished JSON lines.
pub trait RecordSink: Send {
    /// Writes one line (without the trailing newline) and makes it visible
    /// to the downstream reader immediately.
    fn emit(&mut self, line: &str) -> IoResult<()>;
}

/// Stdout sink: one `write_all` plus `flush` per line, so a downstream
/// reader sees each record without delay.
pub struct StdoutSink {
    handle: Stdout,
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self {
            handle: io::stdout(),
        }
    }
}

impl StdoutSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RecordSink for StdoutSink {
    fn emit(&mut self, line: &str) -> IoResult<()> {
        let mut out = self.handle.lock();
        out.write_all(line.as_bytes())?;
        out.write_all(b"\n")?;
        out.flush()
    }
}

/// In-memory sink for tests and snapshots.
#[derive(Clone, Default)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all emitted lines.
    pub fn snapshot(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Clears captured lines.
    pub fn clear(&self) {
        self.lines.lock().unwrap().clear();
    }
}

impl RecordSink for MemorySink {
    fn emit(&mut self, line: &str) -> IoResult<()> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}
