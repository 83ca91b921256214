// src/lib.rs

pub mod cli;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod notify;
pub mod sink;

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::cli::CliArgs;
use crate::errors::{Result, SupervisorError};
use crate::exec::{CommandSpec, RunResult, Supervisor, SupervisorOptions, default_child_env};
use crate::notify::{
    DesktopNotifier, NativeToaster, Notifier, PlatformFlasher, SilentNotifier, WindowTarget,
};
use crate::sink::{FileSink, LogSink};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - command validation (empty argv is a usage error; nothing is spawned)
/// - the log file sink
/// - the desktop notifier (or a silent one for `--no-notify`)
/// - Ctrl-C, which aborts the run through the normal cleanup path
pub async fn run(args: CliArgs) -> Result<RunResult> {
    let command = CommandSpec::new(args.command.clone())?;
    let supervisor = build_supervisor(&args)?;

    info!(command = %command, log_file = ?args.log_file, "supervising command");
    supervisor.run_until(&command, ctrl_c()).await
}

/// Assemble the supervisor described by the CLI flags.
pub fn build_supervisor(args: &CliArgs) -> Result<Supervisor> {
    let sink: Arc<dyn LogSink> = Arc::new(
        FileSink::open(&args.log_file)
            .map_err(|e| SupervisorError::Internal(format!("{e:#}")))?,
    );

    let notifier: Arc<dyn Notifier> = if args.no_notify {
        Arc::new(SilentNotifier)
    } else {
        let toaster = NativeToaster {
            success_icon: args.success_icon.clone(),
            failure_icon: args.failure_icon.clone(),
        };
        let flasher = PlatformFlasher::new(WindowTarget {
            title_fragment: args.window_title.clone(),
            console_fallback: !args.no_console_fallback,
        });
        Arc::new(DesktopNotifier::new(Box::new(toaster), Box::new(flasher)))
    };

    let options = SupervisorOptions {
        echo: !args.quiet,
        grace: Duration::from_millis(args.grace_ms),
        child_env: default_child_env(),
    };

    Ok(Supervisor::new(sink, notifier, options))
}

/// Completes on the first Ctrl-C; never completes if the handler can't be
/// installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}
