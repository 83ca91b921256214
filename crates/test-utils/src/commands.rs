#![allow(dead_code)]

use std::time::Duration;

use termwatch::exec::{CommandSpec, SupervisorOptions};

/// `CommandSpec` from string slices.
pub fn command(argv: &[&str]) -> CommandSpec {
    CommandSpec::new(argv.iter().map(|s| s.to_string()).collect())
        .expect("test command must not be empty")
}

/// `sh -c <script>`.
pub fn sh(script: &str) -> CommandSpec {
    command(&["sh", "-c", script])
}

/// Options for tests: no console echo, short grace period.
pub fn quiet_options() -> SupervisorOptions {
    SupervisorOptions {
        echo: false,
        grace: Duration::from_millis(500),
        ..SupervisorOptions::default()
    }
}

/// Whether a pid still refers to a live (or unreaped) process.
#[cfg(unix)]
pub fn is_alive(pid: u32) -> bool {
    // kill(pid, 0) only checks for existence and permission.
    std::process::Command::new("kill")
        .arg("-0")
        .arg(pid.to_string())
        .stderr(std::process::Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Poll until `pid` is gone, panicking after `timeout`.
#[cfg(unix)]
pub async fn wait_until_gone(pid: u32, timeout: Duration) {
    let deadline = tokio::time::Instant::now() + timeout;
    while is_alive(pid) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "process {pid} still running after {timeout:?}"
        );
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}
