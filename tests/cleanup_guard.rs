#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use termwatch::errors::{exit_code, SupervisorError};
use termwatch::exec::Supervisor;
use termwatch::sink::{LogSource, MemorySink};
use termwatch_test_utils::commands::{is_alive, quiet_options, sh, wait_until_gone};
use termwatch_test_utils::fake_notifier::RecordingNotifier;
use termwatch_test_utils::faulty_sink::PanickingSink;
use tokio::sync::oneshot;

/// Prints its own pid, then keeps running for a long time.
const LONG_RUNNER: &str = "echo $$; exec sleep 30";

/// Wait until the child's first stdout line (its pid) shows up in `sink`.
async fn first_stdout_pid(sink: &MemorySink) -> u32 {
    loop {
        if let Some(line) = sink.messages(LogSource::Stdout).first() {
            return line.parse().expect("pid line");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn interrupt_after_spawn_stops_the_child_and_notifies_failure() {
    init_tracing();
    let sink = MemorySink::new();
    let notifier = RecordingNotifier::new();
    let supervisor = Supervisor::new(
        Arc::new(sink.clone()),
        Arc::new(notifier.clone()),
        quiet_options(),
    );

    let (tx, rx) = oneshot::channel::<u32>();
    let watcher_sink = sink.clone();
    tokio::spawn(async move {
        let pid = first_stdout_pid(&watcher_sink).await;
        let _ = tx.send(pid);
    });

    let (pid_tx, pid_rx) = oneshot::channel::<u32>();
    let interrupt = async move {
        if let Ok(pid) = rx.await {
            let _ = pid_tx.send(pid);
        }
    };

    let outcome = with_timeout(supervisor.run_until(&sh(LONG_RUNNER), interrupt)).await;
    let pid = pid_rx.await.expect("child pid");

    assert!(matches!(outcome, Err(SupervisorError::Interrupted)));
    assert_eq!(exit_code(&outcome), 1);
    assert!(!is_alive(pid), "child {pid} survived the supervisor");

    assert!(!notifier.only_call().success);
    assert!(sink.contains(
        LogSource::Supervisor,
        "Error: interrupted before the command finished"
    ));
}

#[tokio::test]
async fn shutdown_output_is_logged_after_an_interrupt() {
    init_tracing();
    let sink = MemorySink::new();
    let notifier = RecordingNotifier::new();
    let supervisor = Supervisor::new(
        Arc::new(sink.clone()),
        Arc::new(notifier.clone()),
        quiet_options(),
    );
    let script = "trap 'echo shutting-down; echo bye >&2; exit 0' TERM; \
                  echo ready; while :; do sleep 0.05; done";

    let watcher_sink = sink.clone();
    let interrupt = async move {
        while !watcher_sink.contains(LogSource::Stdout, "ready") {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    };

    let outcome = with_timeout(supervisor.run_until(&sh(script), interrupt)).await;

    assert!(matches!(outcome, Err(SupervisorError::Interrupted)), "{outcome:?}");
    assert_eq!(
        sink.messages(LogSource::Stdout),
        vec!["ready", "shutting-down"]
    );
    assert_eq!(sink.messages(LogSource::Stderr), vec!["bye"]);
    assert!(!notifier.only_call().success);
}

#[tokio::test]
async fn internal_fault_in_a_pump_still_cleans_up() {
    init_tracing();
    let sink = PanickingSink::new("boom");
    let notifier = RecordingNotifier::new();
    let supervisor = Supervisor::new(
        Arc::new(sink.clone()),
        Arc::new(notifier.clone()),
        quiet_options(),
    );

    let outcome = with_timeout(supervisor.run(&sh("echo $$; echo boom; exec sleep 30"))).await;

    assert!(matches!(outcome, Err(SupervisorError::Internal(_))), "{outcome:?}");
    let pid: u32 = sink.recorded().messages(LogSource::Stdout)[0].parse().unwrap();
    assert!(!is_alive(pid), "child {pid} survived the supervisor");
    assert!(!notifier.only_call().success);
}

#[tokio::test]
async fn cancelled_supervisor_task_does_not_orphan_the_child() {
    init_tracing();
    let sink = MemorySink::new();
    let supervisor = Supervisor::new(
        Arc::new(sink.clone()),
        Arc::new(RecordingNotifier::new()),
        quiet_options(),
    );

    let task = tokio::spawn(async move { supervisor.run(&sh(LONG_RUNNER)).await });
    let pid = with_timeout(first_stdout_pid(&sink)).await;
    assert!(is_alive(pid));

    task.abort();
    assert!(task.await.unwrap_err().is_cancelled());

    wait_until_gone(pid, Duration::from_secs(5)).await;
}

#[tokio::test]
async fn finished_child_is_not_waited_on_again() {
    init_tracing();
    let sink = MemorySink::new();
    let notifier = RecordingNotifier::new();
    let supervisor = Supervisor::new(
        Arc::new(sink.clone()),
        Arc::new(notifier.clone()),
        quiet_options(),
    );

    // Cleanup of an already-exited child must not add the grace period.
    let started = std::time::Instant::now();
    with_timeout(supervisor.run(&sh("echo $$"))).await.unwrap();
    assert!(started.elapsed() < Duration::from_millis(500));

    let pid: u32 = sink.messages(LogSource::Stdout)[0].parse().unwrap();
    assert!(!is_alive(pid));
}
