// src/exec/launcher.rs

//! Spawning the child with both output streams piped.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::info;

use crate::errors::{Result, SupervisorError};
use crate::exec::{CommandSpec, SupervisorOptions};

/// Start `spec` with stdout and stderr piped and stdin inherited.
///
/// Nothing is returned unless the OS actually created the process.
pub fn spawn(spec: &CommandSpec, options: &SupervisorOptions) -> Result<Child> {
    let mut cmd = Command::new(spec.program());
    cmd.args(spec.args())
        .envs(options.child_env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        // Backstop only; the guard normally stops the child first.
        .kill_on_drop(true);

    let child = cmd.spawn().map_err(|source| SupervisorError::Spawn {
        program: spec.program().to_string(),
        source,
    })?;

    info!(
        program = %spec.program(),
        pid = child.id().unwrap_or(0),
        "child process started"
    );
    Ok(child)
}
