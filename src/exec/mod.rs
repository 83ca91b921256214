// src/exec/mod.rs

//! Process supervision.
//!
//! - [`command`] validates the argv to run.
//! - [`launcher`] spawns the child with both output streams piped.
//! - [`pump`] drains stdout and stderr concurrently into the console and the
//!   log sink.
//! - [`guard`] owns the child and guarantees it is stopped on every path.
//! - [`phase`] tracks the lifecycle of one run.
//! - [`supervisor`] ties it together and decides success or failure.

use std::time::Duration;

pub mod command;
pub mod guard;
pub mod launcher;
pub mod phase;
pub mod pump;
pub mod result;
pub mod supervisor;

pub use command::CommandSpec;
pub use guard::{ChildGuard, CleanupOutcome, DEFAULT_GRACE};
pub use phase::{Phase, PhaseTracker};
pub use pump::{PumpTotals, Pumps};
pub use result::RunResult;
pub use supervisor::Supervisor;

/// Knobs for one supervised run.
#[derive(Debug, Clone)]
pub struct SupervisorOptions {
    /// Echo child output to our own stdout/stderr.
    pub echo: bool,
    /// How long to wait after asking the child to stop before killing it.
    pub grace: Duration,
    /// Extra environment for the child.
    pub child_env: Vec<(String, String)>,
}

impl Default for SupervisorOptions {
    fn default() -> Self {
        Self {
            echo: true,
            grace: DEFAULT_GRACE,
            child_env: default_child_env(),
        }
    }
}

/// Informational markers for the child: ask interpreters not to buffer
/// output, and let scripts detect they are running under termwatch.
pub fn default_child_env() -> Vec<(String, String)> {
    vec![
        ("PYTHONUNBUFFERED".to_string(), "1".to_string()),
        ("TERMWATCH_ACTIVE".to_string(), "1".to_string()),
    ]
}
