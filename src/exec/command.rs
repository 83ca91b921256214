// src/exec/command.rs

//! The command line handed to `termwatch`, validated once up front.

use std::fmt;

use crate::errors::{Result, SupervisorError};

/// Program plus arguments. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
}

impl CommandSpec {
    /// Build a spec from raw argv. An empty list is a usage error.
    pub fn new(argv: Vec<String>) -> Result<Self> {
        if argv.is_empty() {
            return Err(SupervisorError::EmptyCommand);
        }
        Ok(Self { argv })
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// Human-readable form used in notifications and error messages.
    pub fn description(&self) -> String {
        self.argv.join(" ")
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.description())
    }
}

impl TryFrom<Vec<String>> for CommandSpec {
    type Error = SupervisorError;

    fn try_from(argv: Vec<String>) -> Result<Self> {
        Self::new(argv)
    }
}
