// src/exec/result.rs

use std::time::Duration;

/// What the notifier gets told once the child is gone.
#[derive(Debug, Clone, PartialEq)]
pub struct RunResult {
    pub description: String,
    pub duration: Duration,
    pub success: bool,
    /// `None` when the child never started, or was killed by a signal.
    pub exit_code: Option<i32>,
}

impl RunResult {
    pub fn new(
        description: String,
        duration: Duration,
        success: bool,
        exit_code: Option<i32>,
    ) -> Self {
        Self {
            description,
            duration,
            success,
            exit_code,
        }
    }

    pub fn duration_secs(&self) -> f64 {
        self.duration.as_secs_f64()
    }
}
