// src/sink/file.rs

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};

use super::{LogEntry, LogSink};

/// Appends entries to a plain text file. The file is never truncated.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("opening log file {:?}", path))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }
}

impl LogSink for FileSink {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        // Format outside the lock; one write_all per entry keeps lines whole.
        let line = entry.format_line();
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("log file lock poisoned"))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("writing to log file {:?}", self.path))
    }
}
