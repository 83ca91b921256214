// src/sink/memory.rs

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};

use super::{LogEntry, LogSink, LogSource};

/// In-memory sink; clones share the same buffer.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Messages from one source, in append order.
    pub fn messages(&self, source: LogSource) -> Vec<String> {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.source == source)
            .map(|e| e.message.clone())
            .collect()
    }

    pub fn contains(&self, source: LogSource, message: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .any(|e| e.source == source && e.message == message)
    }
}

impl LogSink for MemorySink {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory sink lock poisoned"))?;
        entries.push(entry.clone());
        Ok(())
    }
}
