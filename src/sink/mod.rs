// src/sink/mod.rs

//! Append-only destinations for child output.
//!
//! Every line the child prints becomes one [`LogEntry`]. Sinks are shared by
//! both stream pumps, so `append` must write a whole entry atomically with
//! respect to other appends; it is the unit of interleaving.

use std::fmt::{self, Debug};

use anyhow::Result;
use chrono::{DateTime, Local};

pub mod file;
pub mod memory;

pub use file::FileSink;
pub use memory::MemorySink;

/// Default log file name, created in the current working directory.
pub const DEFAULT_LOG_FILE: &str = "termwatch_output.log";

/// Where a log line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSource {
    Stdout,
    Stderr,
    /// Messages written by termwatch itself (e.g. faults).
    Supervisor,
}

impl LogSource {
    /// Marker placed in front of the message in the log file.
    pub fn tag(self) -> Option<&'static str> {
        match self {
            LogSource::Stdout => None,
            LogSource::Stderr => Some("[stderr]"),
            LogSource::Supervisor => Some("[termwatch]"),
        }
    }
}

impl fmt::Display for LogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogSource::Stdout => "stdout",
            LogSource::Stderr => "stderr",
            LogSource::Supervisor => "termwatch",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub source: LogSource,
    pub message: String,
}

impl LogEntry {
    pub fn new(source: LogSource, message: impl Into<String>) -> Self {
        Self {
            timestamp: Local::now(),
            source,
            message: message.into(),
        }
    }

    /// Render as a single log-file line, including the trailing newline.
    ///
    /// `2024-05-01 13:37:00,123 - [stderr] warning: unused variable`
    pub fn format_line(&self) -> String {
        let ts = self.timestamp.format("%Y-%m-%d %H:%M:%S,%3f");
        match self.source.tag() {
            Some(tag) => format!("{ts} - {tag} {}\n", self.message),
            None => format!("{ts} - {}\n", self.message),
        }
    }
}

/// Append-only log destination shared by the stream pumps.
pub trait LogSink: Send + Sync + Debug {
    fn append(&self, entry: &LogEntry) -> Result<()>;
}
