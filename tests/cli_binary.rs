#![cfg(unix)]

use std::process::{Command, Output};

use tempfile::TempDir;

fn termwatch(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_termwatch"))
        .current_dir(dir.path())
        .args(args)
        .env_remove("TERMWATCH_LOG")
        .output()
        .expect("running termwatch binary")
}

fn log_contents(dir: &TempDir) -> String {
    std::fs::read_to_string(dir.path().join("termwatch_output.log")).unwrap_or_default()
}

#[test]
fn successful_command_exits_zero_and_logs_to_cwd() {
    let dir = tempfile::tempdir().unwrap();
    let out = termwatch(&dir, &["--no-notify", "echo", "hello"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("hello\n"), "{stdout}");
    assert!(stdout.contains("Cleaning up process resources."), "{stdout}");
    assert!(stdout.contains("Command echo hello completed successfully."));
    assert!(log_contents(&dir).lines().any(|l| l.ends_with(" - hello")));
}

#[test]
fn failing_command_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = termwatch(&dir, &["--no-notify", "-q", "sh", "-c", "echo bad >&2; exit 3"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("Command sh -c echo bad >&2; exit 3 failed"), "{stderr}");

    let log = log_contents(&dir);
    assert!(log.lines().any(|l| l.ends_with(" - [stderr] bad")), "{log}");
    assert!(log.contains("[termwatch] Error:"), "{log}");
}

#[test]
fn quiet_flag_suppresses_echo() {
    let dir = tempfile::tempdir().unwrap();
    let out = termwatch(&dir, &["--no-notify", "--quiet", "echo", "secret"]);

    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(!stdout.contains("secret\n"));
    assert!(!stdout.contains("Cleaning up"));
    assert!(log_contents(&dir).contains(" - secret"));
}

#[test]
fn no_command_prints_usage_and_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = termwatch(&dir, &["--no-notify"]);

    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Usage:"));
    assert!(!dir.path().join("termwatch_output.log").exists());
}

#[test]
fn missing_program_exits_one() {
    let dir = tempfile::tempdir().unwrap();
    let out = termwatch(&dir, &["--no-notify", "termwatch-no-such-program"]);

    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("failed to start 'termwatch-no-such-program'"), "{stderr}");
}

#[test]
fn custom_log_file_is_appended() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("custom.log");
    let log_arg = log.to_str().unwrap();

    for word in ["first", "second"] {
        let out = termwatch(&dir, &["--no-notify", "-q", "--log-file", log_arg, "echo", word]);
        assert_eq!(out.status.code(), Some(0));
    }

    let contents = std::fs::read_to_string(&log).unwrap();
    let lines: Vec<_> = contents.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - first"));
    assert!(lines[1].ends_with(" - second"));
}
