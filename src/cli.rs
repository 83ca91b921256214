// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, ValueEnum};

use crate::notify::window::DEFAULT_WINDOW_TITLE;
use crate::sink::DEFAULT_LOG_FILE;

/// Command-line arguments for `termwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "termwatch",
    version,
    about = "Run a command, log its output, and get a desktop alert when it finishes.",
    long_about = None
)]
pub struct CliArgs {
    /// File that receives every output line, with timestamps.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_LOG_FILE)]
    pub log_file: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TERMWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Don't echo the command's output to the console.
    #[arg(short, long)]
    pub quiet: bool,

    /// Skip the toast and the window flash.
    #[arg(long)]
    pub no_notify: bool,

    /// Title fragment of the window to flash when done.
    #[arg(long, value_name = "TEXT", default_value = DEFAULT_WINDOW_TITLE)]
    pub window_title: String,

    /// Don't flash the console window when no matching window is found.
    #[arg(long)]
    pub no_console_fallback: bool,

    /// Milliseconds to wait for the command to stop before killing it.
    #[arg(long, value_name = "MS", default_value_t = 1000)]
    pub grace_ms: u64,

    /// Toast icon for successful runs (ignored if the file doesn't exist).
    #[arg(long, value_name = "PATH")]
    pub success_icon: Option<PathBuf>,

    /// Toast icon for failed runs (ignored if the file doesn't exist).
    #[arg(long, value_name = "PATH")]
    pub failure_icon: Option<PathBuf>,

    /// The command to run, followed by its arguments.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

/// One-line usage text, printed when no command is given.
pub fn usage() -> String {
    CliArgs::command().render_usage().to_string()
}
