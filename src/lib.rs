//! tfdrift - Terraform drift detection
//!
//! Runs `terraform init`, `plan` and `show -json` against a working directory and
//! turns the plan's status fields into a drift verdict and process exit code.

pub mod cli;
pub mod config;
pub mod drift;
pub mod error;
pub mod output;
pub mod terraform;

pub use config::CheckerConfig;
pub use drift::{DriftChecker, RenderMode, Verdict, classify};
pub use error::DriftError;
pub use terraform::{
    CommandOutput, CommandRunner, OutputMode, PlanResult, ProcessRunner, TerraformCommand,
};
