// src/errors.rs

//! Crate-wide error types.
//!
//! Only [`SupervisorError::Spawn`] and [`SupervisorError::CommandFailed`]
//! (plus internal faults) ever reach the process exit code. Stream read
//! errors, cleanup timeouts and notifier failures are logged where they
//! happen and never bubble up.

use thiserror::Error;

use crate::exec::RunResult;

#[derive(Error, Debug)]
pub enum SupervisorError {
    #[error("no command given")]
    EmptyCommand,

    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Non-zero exit. `code` is -1 when the child was killed by a signal.
    #[error("'{description}' {}", exit_reason(.code, .signal))]
    CommandFailed {
        code: i32,
        signal: Option<i32>,
        description: String,
    },

    #[error("interrupted before the command finished")]
    Interrupted,

    #[error("internal fault: {0}")]
    Internal(String),
}

fn exit_reason(code: &i32, signal: &Option<i32>) -> String {
    match signal {
        Some(sig) => format!("was terminated by signal {sig}"),
        None => format!("exited with status {code}"),
    }
}

/// Failures of the best-effort alerting collaborators.
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("toast notification failed: {0}")]
    Toast(String),

    #[error("window flash failed: {0}")]
    WindowFlash(String),
}

pub type Result<T> = std::result::Result<T, SupervisorError>;

/// Process exit code for a finished run: 0 on success, 1 otherwise.
pub fn exit_code(outcome: &Result<RunResult>) -> i32 {
    match outcome {
        Ok(result) if result.success => 0,
        _ => 1,
    }
}
