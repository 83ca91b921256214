// src/exec/supervisor.rs

//! One supervised run, start to finish.
//!
//! ```text
//! Idle -> Spawning -> Running -> Collecting -> Notifying -> Done
//!            \           |           /             ^
//!             `------> Aborting ---'---------------'
//! ```
//!
//! The notifier is always called before any failure is returned, and the
//! child guard is always released on the way into `Done`. The output pumps
//! outlive the guard: they are drained only after the child has been
//! stopped, so whatever it prints while shutting down still gets logged.

use std::future::Future;
use std::process::ExitStatus;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::errors::{Result, SupervisorError};
use crate::exec::launcher;
use crate::exec::{
    ChildGuard, CommandSpec, Phase, PhaseTracker, Pumps, RunResult, SupervisorOptions,
};
use crate::notify::Notifier;
use crate::sink::{LogEntry, LogSink, LogSource};

/// Exit status and timing of a child that ran to completion.
#[derive(Debug, Clone, Copy)]
struct Completion {
    code: Option<i32>,
    signal: Option<i32>,
    duration: Duration,
}

pub struct Supervisor {
    sink: Arc<dyn LogSink>,
    notifier: Arc<dyn Notifier>,
    options: SupervisorOptions,
}

impl Supervisor {
    pub fn new(
        sink: Arc<dyn LogSink>,
        notifier: Arc<dyn Notifier>,
        options: SupervisorOptions,
    ) -> Self {
        Self {
            sink,
            notifier,
            options,
        }
    }

    /// Run `command` to completion.
    ///
    /// Returns the result on exit status 0, `CommandFailed` on any other
    /// status, or the fault that aborted supervision.
    pub async fn run(&self, command: &CommandSpec) -> Result<RunResult> {
        self.run_until(command, std::future::pending()).await
    }

    /// Like [`run`](Self::run), but abort (notify, then stop the child) as
    /// soon as `interrupt` completes.
    pub async fn run_until<F>(&self, command: &CommandSpec, interrupt: F) -> Result<RunResult>
    where
        F: Future<Output = ()>,
    {
        let description = command.description();
        let mut phase = PhaseTracker::new();
        let mut guard: Option<ChildGuard> = None;
        let mut pumps: Option<Pumps> = None;

        let started = Instant::now();
        let outcome = self
            .supervise(command, &mut phase, &mut guard, &mut pumps, started, interrupt)
            .await;

        let (result, failure) = match outcome {
            Ok(done) => {
                let success = done.code == Some(0);
                let failure = (!success).then(|| SupervisorError::CommandFailed {
                    code: done.code.unwrap_or(-1),
                    signal: done.signal,
                    description: description.clone(),
                });
                (
                    RunResult::new(description.clone(), done.duration, success, done.code),
                    failure,
                )
            }
            Err(err) => {
                phase.abort();
                error!(command = %description, error = %err, "supervision aborted");
                (
                    RunResult::new(description.clone(), started.elapsed(), false, None),
                    Some(err),
                )
            }
        };
        if let Some(err) = &failure {
            self.log_failure(err);
        }

        phase.advance(Phase::Notifying);
        self.notify(&result).await;

        phase.advance(Phase::Done);
        if let Some(guard) = guard.take() {
            self.announce_cleanup().await;
            let cleanup = guard.release().await;
            debug!(?cleanup, "child cleanup finished");
        }
        if let Some(pumps) = pumps.take() {
            pumps.drain(self.options.grace).await;
        }
        debug!(phases = ?phase.history(), "run finished");

        match failure {
            Some(err) => Err(err),
            None => Ok(result),
        }
    }

    async fn supervise<F>(
        &self,
        command: &CommandSpec,
        phase: &mut PhaseTracker,
        guard_slot: &mut Option<ChildGuard>,
        pumps_slot: &mut Option<Pumps>,
        started: Instant,
        interrupt: F,
    ) -> Result<Completion>
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(interrupt);

        phase.advance(Phase::Spawning);
        let child = launcher::spawn(command, &self.options)?;
        let guard = guard_slot.insert(ChildGuard::new(child, self.options.grace));
        let pid = guard.pid();
        let (stdout, stderr) = guard.take_output().ok_or_else(|| {
            SupervisorError::Internal("child output streams were not piped".to_string())
        })?;

        phase.advance(Phase::Running);
        let pumps = pumps_slot.insert(Pumps::start(
            stdout,
            stderr,
            Arc::clone(&self.sink),
            self.options.echo,
        ));
        let totals = tokio::select! {
            joined = pumps.join() => joined?,
            () = &mut interrupt => {
                warn!(pid = ?pid, "interrupted while the command was running");
                return Err(SupervisorError::Interrupted);
            }
        };
        debug!(
            stdout_lines = totals.stdout_lines,
            stderr_lines = totals.stderr_lines,
            "both streams drained"
        );

        phase.advance(Phase::Collecting);
        let status = tokio::select! {
            status = guard.wait() => status.map_err(|err| {
                SupervisorError::Internal(format!("waiting for child: {err}"))
            })?,
            () = &mut interrupt => {
                warn!(pid = ?pid, "interrupted while collecting exit status");
                return Err(SupervisorError::Interrupted);
            }
        };
        let duration = started.elapsed();

        info!(
            pid = ?pid,
            exit_code = ?status.code(),
            duration_secs = duration.as_secs_f64(),
            "child exited"
        );
        Ok(Completion {
            code: status.code(),
            signal: exit_signal(&status),
            duration,
        })
    }

    /// Console notice that the child is being stopped, shown unless quiet.
    async fn announce_cleanup(&self) {
        if !self.options.echo {
            return;
        }
        let mut stdout = tokio::io::stdout();
        let written = async {
            stdout.write_all(b"Cleaning up process resources.\n").await?;
            stdout.flush().await
        };
        if let Err(err) = written.await {
            debug!(error = %err, "console write failed");
        }
    }

    /// Call the notifier off the async runtime; whatever goes wrong in there
    /// (errors or panics) is only logged.
    async fn notify(&self, result: &RunResult) {
        let notifier = Arc::clone(&self.notifier);
        let snapshot = result.clone();
        match tokio::task::spawn_blocking(move || notifier.notify(&snapshot)).await {
            Ok(Ok(())) => debug!(success = result.success, "notification sent"),
            Ok(Err(err)) => warn!(error = %err, "notification failed"),
            Err(err) => warn!(error = %err, "notifier panicked"),
        }
    }

    fn log_failure(&self, err: &SupervisorError) {
        let entry = LogEntry::new(LogSource::Supervisor, format!("Error: {err}"));
        if let Err(sink_err) = self.sink.append(&entry) {
            warn!(error = %sink_err, "failed to record error in log");
        }
    }
}

#[cfg(unix)]
fn exit_signal(status: &ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: &ExitStatus) -> Option<i32> {
    None
}
