use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use tfdrift::cli::Cli;
use tfdrift::{DriftChecker, DriftError, ProcessRunner};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(cli.verbose);

    let checker = DriftChecker::new(cli.checker_config(), ProcessRunner);

    let code = match checker.run().await {
        Ok(verdict) => verdict.exit_code(),
        Err(err) => {
            report_error(&err);
            err.exit_code()
        }
    };

    Ok(ExitCode::from(code))
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn report_error(err: &DriftError) {
    match err {
        DriftError::CommandFailed { command, code, .. } => {
            tracing::error!("Command failed: {command}");
            tracing::error!("Return code: {code}");
            if let Some(stderr) = err.diagnostics() {
                tracing::error!("Standard error output:\n{}", stderr.trim_end());
            }
        }
        other => tracing::error!("{other}"),
    }
}
