// src/exec/guard.rs

//! Ownership of the child process and the guarantee that it gets stopped.
//!
//! [`ChildGuard`] is the only owner of the `tokio::process::Child`. The
//! supervisor calls [`ChildGuard::release`] on every path it controls. If the
//! supervising future is dropped instead (cancelled task, panic), `Drop` hands
//! the child to a background task that performs the same two-phase stop.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::{Child, ChildStderr, ChildStdout};
use tracing::{debug, info, warn};

/// Default wait between the termination request and the forced kill.
pub const DEFAULT_GRACE: Duration = Duration::from_secs(1);

/// How the child ended up stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// Nothing to do; the child had already exited.
    AlreadyExited,
    /// The child exited within the grace period after being asked to.
    Terminated,
    /// The child had to be force-killed.
    Killed,
}

#[derive(Debug)]
pub struct ChildGuard {
    child: Option<Child>,
    pid: Option<u32>,
    grace: Duration,
}

impl ChildGuard {
    pub fn new(child: Child, grace: Duration) -> Self {
        let pid = child.id();
        Self {
            child: Some(child),
            pid,
            grace,
        }
    }

    /// OS pid captured at spawn time.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Move the piped output streams out of the child, for the pumps.
    pub fn take_output(&mut self) -> Option<(ChildStdout, ChildStderr)> {
        let child = self.child.as_mut()?;
        match (child.stdout.take(), child.stderr.take()) {
            (Some(out), Some(err)) => Some((out, err)),
            _ => None,
        }
    }

    /// Wait for the child to exit on its own.
    pub async fn wait(&mut self) -> io::Result<ExitStatus> {
        match self.child.as_mut() {
            Some(child) => child.wait().await,
            None => Err(io::Error::other("child already released")),
        }
    }

    /// Make sure the child is no longer running. Consumes the guard, so the
    /// child cannot be touched afterwards.
    pub async fn release(mut self) -> CleanupOutcome {
        info!(pid = ?self.pid, "cleaning up process resources");
        match self.child.take() {
            Some(child) => stop_child(child, self.grace).await,
            None => CleanupOutcome::AlreadyExited,
        }
    }
}

impl Drop for ChildGuard {
    fn drop(&mut self) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                debug!(pid = ?self.pid, "guard dropped with live child; stopping in background");
                let grace = self.grace;
                handle.spawn(async move {
                    stop_child(child, grace).await;
                });
            }
            Err(_) => {
                if let Err(err) = child.start_kill() {
                    warn!(pid = ?self.pid, error = %err, "failed to kill child without a runtime");
                }
            }
        }
    }
}

/// Two-phase stop: ask nicely, wait up to `grace`, then kill.
async fn stop_child(mut child: Child, grace: Duration) -> CleanupOutcome {
    let pid = child.id();

    let running = match child.try_wait() {
        Ok(Some(status)) => {
            debug!(?pid, code = ?status.code(), "child already exited");
            return CleanupOutcome::AlreadyExited;
        }
        Ok(None) => true,
        Err(err) => {
            warn!(?pid, error = %err, "could not poll child; forcing kill");
            false
        }
    };

    if running {
        request_termination(&mut child);
        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                info!(?pid, code = ?status.code(), "child stopped after termination request");
                return CleanupOutcome::Terminated;
            }
            Ok(Err(err)) => {
                warn!(?pid, error = %err, "waiting for child failed; killing");
            }
            Err(_) => {
                warn!(
                    ?pid,
                    grace_ms = grace.as_millis() as u64,
                    "child did not exit in time; killing"
                );
            }
        }
    }

    if let Err(err) = child.kill().await {
        warn!(?pid, error = %err, "failed to kill child");
    }
    CleanupOutcome::Killed
}

#[cfg(unix)]
fn request_termination(child: &mut Child) {
    let Some(pid) = child.id() else {
        return;
    };
    // SAFETY: kill(2) on our own, not yet reaped, child.
    let rc = unsafe { libc::kill(pid as libc::pid_t, libc::SIGTERM) };
    if rc != 0 {
        warn!(pid, error = %io::Error::last_os_error(), "failed to send SIGTERM");
    }
}

// Windows has no SIGTERM; TerminateProcess is the only request available.
#[cfg(not(unix))]
fn request_termination(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        warn!(pid = ?child.id(), error = %err, "failed to request termination");
    }
}
