use std::path::PathBuf;

use thiserror::Error;

/// Exit code used for every failure that has no external exit status to propagate.
pub const FAILURE_EXIT_CODE: u8 = 1;

#[derive(Debug, Error)]
pub enum DriftError {
    /// An external command ran and exited non-zero.
    #[error("command failed: {command} (exit code {code})")]
    CommandFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// An external command was killed before it produced an exit code.
    #[error("command terminated by signal: {command}")]
    CommandTerminated { command: String },

    #[error("failed to spawn {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read plan JSON at {}: {source}", path.display())]
    PlanRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write plan JSON to {}: {source}", path.display())]
    PlanWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse plan JSON at {}: {source}", path.display())]
    PlanParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl DriftError {
    /// Process exit code for this error.
    ///
    /// A failing command's own exit code is propagated verbatim. Codes outside
    /// `1..=255` cannot be reported by a process, so they collapse to 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            DriftError::CommandFailed { code, .. } => u8::try_from(*code)
                .ok()
                .filter(|c| *c != 0)
                .unwrap_or(FAILURE_EXIT_CODE),
            _ => FAILURE_EXIT_CODE,
        }
    }

    /// Captured diagnostic output of a failed command, if any was produced.
    pub fn diagnostics(&self) -> Option<&str> {
        match self {
            DriftError::CommandFailed { stderr, .. } if !stderr.trim().is_empty() => {
                Some(stderr.as_str())
            }
            _ => None,
        }
    }
}
