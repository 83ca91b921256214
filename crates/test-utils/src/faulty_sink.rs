use termwatch::sink::{LogEntry, LogSink, MemorySink};

/// Sink that behaves like `MemorySink` until it sees `trigger`, then panics.
///
/// Used to inject an internal fault into a running stream pump.
#[derive(Debug, Clone)]
pub struct PanickingSink {
    inner: MemorySink,
    trigger: String,
}

impl PanickingSink {
    pub fn new(trigger: &str) -> Self {
        Self {
            inner: MemorySink::new(),
            trigger: trigger.to_string(),
        }
    }

    pub fn recorded(&self) -> &MemorySink {
        &self.inner
    }
}

impl LogSink for PanickingSink {
    fn append(&self, entry: &LogEntry) -> anyhow::Result<()> {
        if entry.message == self.trigger {
            panic!("injected sink fault on {:?}", entry.message);
        }
        self.inner.append(entry)
    }
}
