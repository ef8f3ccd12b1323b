mod plan;
mod runner;

pub use plan::{Change, PlanResult, ResourceChange};
pub use runner::{CommandOutput, CommandRunner, OutputMode, ProcessRunner, TerraformCommand};
