//! Drift detection: runs `init`, `plan` and `show -json` in sequence, then
//! classifies the resulting plan document.

use crate::config::CheckerConfig;
use crate::error::{DriftError, FAILURE_EXIT_CODE};
use crate::output::drift_summary;
use crate::terraform::{CommandOutput, CommandRunner, OutputMode, PlanResult, TerraformCommand};

/// Outcome of a completed drift check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    NoDrift,
    Drift,
    /// `applyable` was null, missing, or not a boolean.
    Unknown,
    /// Terraform reported the plan as errored or incomplete.
    Incomplete,
}

impl Verdict {
    pub fn exit_code(self) -> u8 {
        match self {
            Verdict::NoDrift => 0,
            Verdict::Drift | Verdict::Unknown | Verdict::Incomplete => FAILURE_EXIT_CODE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// `show -json`, written to the plan JSON artifact.
    #[default]
    Json,
    /// `show`, streamed to the console for the operator.
    Text,
}

/// `applyable` is only consulted once the plan is known to be complete and error free.
pub fn classify(plan: &PlanResult) -> Verdict {
    if plan.is_errored() || !plan.is_complete() {
        return Verdict::Incomplete;
    }

    match plan.applyable() {
        Some(true) => Verdict::Drift,
        Some(false) => Verdict::NoDrift,
        None => Verdict::Unknown,
    }
}

pub struct DriftChecker<R> {
    config: CheckerConfig,
    runner: R,
}

impl<R: CommandRunner> DriftChecker<R> {
    pub fn new(config: CheckerConfig, runner: R) -> Self {
        Self { config, runner }
    }

    fn terraform(&self) -> TerraformCommand {
        TerraformCommand::new(&self.config.terraform_bin, &self.config.working_dir)
    }

    async fn execute(
        &self,
        command: TerraformCommand,
        mode: OutputMode,
    ) -> Result<CommandOutput, DriftError> {
        let output = self.runner.run(&command, mode).await?.check(&command)?;
        if !output.stderr.trim().is_empty() {
            tracing::debug!(
                command = %command,
                stderr = %output.stderr.trim_end(),
                "command stderr"
            );
        }
        Ok(output)
    }

    pub async fn initialize(&self) -> Result<(), DriftError> {
        tracing::info!("Initializing Terraform...");
        self.execute(self.terraform().arg("init"), OutputMode::Inherit)
            .await?;
        tracing::info!("Terraform initialization completed.");
        Ok(())
    }

    pub async fn produce_plan(&self) -> Result<(), DriftError> {
        tracing::info!("Running Terraform plan...");
        let command = self
            .terraform()
            .arg("plan")
            .arg("-out")
            .arg(&self.config.plan_file);
        self.execute(command, OutputMode::Discard).await?;
        tracing::info!(plan_file = %self.config.plan_file, "Terraform plan created.");
        Ok(())
    }

    pub async fn render_plan(&self, mode: RenderMode) -> Result<(), DriftError> {
        match mode {
            RenderMode::Json => {
                tracing::info!("Generating Terraform plan in JSON format...");
                let command = self
                    .terraform()
                    .arg("show")
                    .arg("-json")
                    .arg(&self.config.plan_file);
                let output = self.execute(command, OutputMode::Capture).await?;

                let path = self.config.plan_json_path();
                tokio::fs::write(&path, &output.stdout)
                    .await
                    .map_err(|source| DriftError::PlanWrite {
                        path: path.clone(),
                        source,
                    })?;
                tracing::info!(path = %path.display(), "Terraform plan JSON saved.");
            }
            RenderMode::Text => {
                tracing::info!("Showing drift");
                let command = self.terraform().arg("show").arg(&self.config.plan_file);
                self.execute(command, OutputMode::Inherit).await?;
            }
        }
        Ok(())
    }

    pub async fn load_plan_result(&self) -> Result<PlanResult, DriftError> {
        tracing::info!("Reading Terraform plan JSON...");
        let plan = PlanResult::load(&self.config.plan_json_path()).await?;
        tracing::debug!(
            format_version = ?plan.format_version,
            terraform_version = ?plan.terraform_version,
            resource_changes = plan.resource_changes.len(),
            "Terraform plan JSON loaded."
        );
        Ok(plan)
    }

    /// Runs the full sequence. The first failing step aborts everything after it.
    pub async fn run(&self) -> Result<Verdict, DriftError> {
        self.initialize().await?;
        self.produce_plan().await?;
        self.render_plan(RenderMode::Json).await?;
        let plan = self.load_plan_result().await?;

        let verdict = classify(&plan);
        self.report(verdict, &plan).await;
        Ok(verdict)
    }

    async fn report(&self, verdict: Verdict, plan: &PlanResult) {
        match verdict {
            Verdict::Incomplete => {
                tracing::error!(
                    errored = ?plan.errored,
                    complete = ?plan.complete,
                    "Terraform plan did not complete successfully or has errored."
                );
            }
            Verdict::Drift => {
                tracing::warn!("Drift detected in Terraform plan.");
                if let Some(table) = drift_summary(plan) {
                    tracing::warn!("Drifted resources:\n{table}");
                }
                // The verdict is already decided; a failed display must not change it.
                if let Err(err) = self.render_plan(RenderMode::Text).await {
                    tracing::warn!(error = %err, "failed to display drift");
                }
                tracing::error!("Exiting");
            }
            Verdict::NoDrift => {
                tracing::info!("No drift detected.");
            }
            Verdict::Unknown => {
                tracing::error!("Unknown plan status.");
                tracing::debug!(applyable = ?plan.applyable, "Applyable");
            }
        }
    }
}
