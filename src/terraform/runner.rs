use std::fmt;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::DriftError;

/// A single Terraform invocation: `<program> -chdir=<dir> <args...>`.
#[derive(Debug, Clone, PartialEq)]
pub struct TerraformCommand {
    pub program: PathBuf,
    pub working_dir: PathBuf,
    pub args: Vec<String>,
}

impl TerraformCommand {
    pub fn new(program: impl Into<PathBuf>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            working_dir: working_dir.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// First argument after `-chdir`, e.g. `init` or `show`.
    pub fn subcommand(&self) -> Option<&str> {
        self.args.first().map(String::as_str)
    }

    pub fn argv(&self) -> Vec<String> {
        let mut argv = Vec::with_capacity(self.args.len() + 1);
        argv.push(format!("-chdir={}", self.working_dir.display()));
        argv.extend(self.args.iter().cloned());
        argv
    }
}

impl fmt::Display for TerraformCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in self.argv() {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Where a command's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Stream stdout and stderr to the operator's console.
    Inherit,
    /// Drop stdout, capture stderr for diagnostics.
    Discard,
    /// Capture both streams.
    Capture,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Turns a non-zero or missing exit code into the matching error.
    pub fn check(self, command: &TerraformCommand) -> Result<Self, DriftError> {
        if self.success() {
            return Ok(self);
        }
        match self.code {
            Some(code) => Err(DriftError::CommandFailed {
                command: command.to_string(),
                code,
                stderr: self.stderr,
            }),
            None => Err(DriftError::CommandTerminated {
                command: command.to_string(),
            }),
        }
    }
}

/// Runs Terraform commands. Swapped for a scripted fake in tests.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(
        &self,
        command: &TerraformCommand,
        mode: OutputMode,
    ) -> Result<CommandOutput, DriftError>;
}

/// Spawns real processes, without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &TerraformCommand,
        mode: OutputMode,
    ) -> Result<CommandOutput, DriftError> {
        let mut cmd = Command::new(&command.program);
        cmd.args(command.argv()).stdin(Stdio::null());

        match mode {
            OutputMode::Inherit => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            OutputMode::Discard => {
                cmd.stdout(Stdio::null()).stderr(Stdio::piped());
            }
            OutputMode::Capture => {
                cmd.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        tracing::debug!(command = %command, ?mode, "spawning");

        // `output()` would force both streams to pipes; `wait_with_output` keeps `mode`.
        let output = cmd
            .spawn()
            .map_err(|source| DriftError::Spawn {
                command: command.to_string(),
                source,
            })?
            .wait_with_output()
            .await
            .map_err(|source| DriftError::Spawn {
                command: command.to_string(),
                source,
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
