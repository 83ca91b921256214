// src/exec/pump.rs

//! Stream pumps: one tokio task per child output stream.
//!
//! Both streams must be drained at the same time. A child writing a lot to
//! stderr blocks once the pipe buffer is full, and it would never get around
//! to closing stdout if we only read stdout.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::{ChildStderr, ChildStdout};
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::errors::{Result, SupervisorError};
use crate::sink::{LogEntry, LogSink, LogSource};

/// Line counts reported by the two pumps once both streams hit EOF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PumpTotals {
    pub stdout_lines: usize,
    pub stderr_lines: usize,
}

impl PumpTotals {
    fn record(&mut self, source: LogSource, lines: usize) {
        match source {
            LogSource::Stderr => self.stderr_lines = lines,
            _ => self.stdout_lines = lines,
        }
    }
}

/// The pair of running pumps for one child.
///
/// The pumps hold the read ends of the child's pipes, so they stay alive
/// until the child is gone: a child that is asked to stop may still write
/// its last words. Dropping `Pumps` detaches the tasks instead of aborting
/// them, for the same reason.
#[derive(Debug)]
pub struct Pumps {
    tasks: JoinSet<(LogSource, usize)>,
    totals: PumpTotals,
}

impl Pumps {
    pub fn start(
        stdout: ChildStdout,
        stderr: ChildStderr,
        sink: Arc<dyn LogSink>,
        echo: bool,
    ) -> Self {
        let mut tasks = JoinSet::new();
        let out_sink = Arc::clone(&sink);
        tasks.spawn(async move {
            let lines = pump_lines(LogSource::Stdout, stdout, out_sink, echo).await;
            (LogSource::Stdout, lines)
        });
        tasks.spawn(async move {
            let lines = pump_lines(LogSource::Stderr, stderr, sink, echo).await;
            (LogSource::Stderr, lines)
        });
        Self {
            tasks,
            totals: PumpTotals::default(),
        }
    }

    /// Wait for every remaining pump to reach EOF.
    ///
    /// Cancel safe: pumps that finished before cancellation are remembered,
    /// and calling `join` again waits only for the rest. A pump that panics
    /// is an internal fault; its sibling keeps draining and can still be
    /// joined afterwards.
    pub async fn join(&mut self) -> Result<PumpTotals> {
        while let Some(joined) = self.tasks.join_next().await {
            match joined {
                Ok((source, lines)) => self.totals.record(source, lines),
                Err(err) => {
                    return Err(SupervisorError::Internal(format!(
                        "output pump failed: {err}"
                    )));
                }
            }
        }
        Ok(self.totals)
    }

    /// Collect whatever the pumps still have once the child has been
    /// stopped. Pipes held open past `grace` (e.g. by a grandchild) are
    /// abandoned.
    pub async fn drain(mut self, grace: Duration) -> PumpTotals {
        match tokio::time::timeout(grace, self.join()).await {
            Ok(Ok(totals)) => {
                debug!(
                    stdout_lines = totals.stdout_lines,
                    stderr_lines = totals.stderr_lines,
                    "remaining output drained"
                );
            }
            Ok(Err(err)) => warn!(error = %err, "output pump failed while draining"),
            Err(_) => {
                warn!(
                    grace_ms = grace.as_millis() as u64,
                    "output still open after the child stopped; abandoning it"
                );
                self.tasks.abort_all();
            }
        }
        self.totals
    }
}

impl Drop for Pumps {
    fn drop(&mut self) {
        self.tasks.detach_all();
    }
}

/// Drain `reader` to EOF, echoing and logging each line.
///
/// A read error ends this pump only. Sink errors are reported once and
/// otherwise ignored so the pipe keeps draining.
pub async fn pump_lines<R>(
    source: LogSource,
    reader: R,
    sink: Arc<dyn LogSink>,
    echo: bool,
) -> usize
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader);
    let mut console = echo.then(|| Console::for_source(source));
    let mut buf = Vec::with_capacity(256);
    let mut lines = 0usize;
    let mut sink_failed = false;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {
                let line = decode_line(&buf);
                if let Some(out) = console.as_mut() {
                    out.write_line(&line).await;
                }
                if let Err(err) = sink.append(&LogEntry::new(source, line)) {
                    if !sink_failed {
                        warn!(stream = %source, error = %err, "failed to write log entry; continuing");
                        sink_failed = true;
                    }
                }
                lines += 1;
            }
            Err(err) => {
                warn!(stream = %source, error = %err, "read error; stopping this stream");
                break;
            }
        }
    }

    debug!(stream = %source, lines, "stream reached end of output");
    lines
}

/// Strip the line terminator and decode, replacing invalid UTF-8.
fn decode_line(buf: &[u8]) -> String {
    let line = buf.strip_suffix(b"\n").unwrap_or(buf);
    let line = line.strip_suffix(b"\r").unwrap_or(line);
    String::from_utf8_lossy(line).into_owned()
}

/// The console stream a pump echoes to: stderr lines to stderr, the rest to
/// stdout.
enum Console {
    Out(tokio::io::Stdout),
    Err(tokio::io::Stderr),
}

impl Console {
    fn for_source(source: LogSource) -> Self {
        match source {
            LogSource::Stderr => Console::Err(tokio::io::stderr()),
            _ => Console::Out(tokio::io::stdout()),
        }
    }

    async fn write_line(&mut self, line: &str) {
        let mut bytes = Vec::with_capacity(line.len() + 1);
        bytes.extend_from_slice(line.as_bytes());
        bytes.push(b'\n');
        let res = match self {
            Console::Out(out) => write_all_flushed(out, &bytes).await,
            Console::Err(err) => write_all_flushed(err, &bytes).await,
        };
        if let Err(err) = res {
            debug!(error = %err, "console echo failed");
        }
    }
}

async fn write_all_flushed<W>(writer: &mut W, bytes: &[u8]) -> std::io::Result<()>
where
    W: tokio::io::AsyncWrite + Unpin,
{
    writer.write_all(bytes).await?;
    writer.flush().await
}
