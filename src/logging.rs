// src/logging.rs

//! Diagnostics for termwatch itself, written to stderr.
//!
//! `--log-level` wins; otherwise `TERMWATCH_LOG` is read as an `EnvFilter`
//! directive string (so `termwatch=debug` works too); otherwise only
//! warnings and errors are shown, leaving the console to the child.

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, EnvFilter};

use crate::cli::LogLevel;

/// Environment variable holding filter directives.
pub const LOG_ENV: &str = "TERMWATCH_LOG";

const DEFAULT_DIRECTIVE: &str = "warn";

pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let env = std::env::var(LOG_ENV).ok();
    fmt()
        .with_env_filter(build_filter(cli_level, env.as_deref()))
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))
}

fn build_filter(cli_level: Option<LogLevel>, env: Option<&str>) -> EnvFilter {
    if let Some(level) = cli_level {
        return EnvFilter::new(directive(level));
    }
    env.and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}

fn directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    }
}

#[cfg(test)]
mod tests {
    use tracing_subscriber::filter::LevelFilter;

    use super::*;

    #[test]
    fn defaults_to_warn() {
        assert_eq!(build_filter(None, None).max_level_hint(), Some(LevelFilter::WARN));
    }

    #[test]
    fn env_directives_apply_without_a_flag() {
        let filter = build_filter(None, Some("debug"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn cli_level_overrides_env() {
        let filter = build_filter(Some(LogLevel::Error), Some("trace"));
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::ERROR));
    }
}
