use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    CheckerConfig, DEFAULT_PLAN_FILE, DEFAULT_PLAN_JSON, DEFAULT_TERRAFORM_BIN,
};

/// Detect drift between Terraform configuration and live infrastructure
///
/// Exits 0 when the plan is empty, 1 when drift is detected or the plan status
/// cannot be determined, and with Terraform's own exit code when a Terraform
/// command fails.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Terraform working directory
    #[arg(long, env = "TF_DATA_DIR")]
    pub working_dir: PathBuf,

    #[arg(long, env = "TFDRIFT_TERRAFORM_BIN", default_value = DEFAULT_TERRAFORM_BIN)]
    pub terraform_bin: PathBuf,

    /// Plan artifact name inside the working directory
    #[arg(long, default_value = DEFAULT_PLAN_FILE)]
    pub plan_file: String,

    /// JSON rendering name inside the working directory
    #[arg(long, default_value = DEFAULT_PLAN_JSON)]
    pub plan_json: String,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn checker_config(&self) -> CheckerConfig {
        CheckerConfig {
            working_dir: self.working_dir.clone(),
            terraform_bin: self.terraform_bin.clone(),
            plan_file: self.plan_file.clone(),
            plan_json: self.plan_json.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;

    fn with_env_removed<T>(vars: &[&str], f: impl FnOnce() -> T) -> T {
        let backups: Vec<_> = vars.iter().map(|v| (*v, std::env::var(v).ok())).collect();
        unsafe {
            for var in vars {
                std::env::remove_var(var);
            }
        }

        let result = f();

        unsafe {
            for (var, value) in backups {
                if let Some(value) = value {
                    std::env::set_var(var, value);
                }
            }
        }
        result
    }

    #[test]
    #[serial]
    fn test_working_dir_from_flag() {
        let cli = with_env_removed(&["TF_DATA_DIR", "TFDRIFT_TERRAFORM_BIN"], || {
            Cli::parse_from(["tfdrift", "--working-dir=/infra"])
        });

        assert_eq!(cli.working_dir, PathBuf::from("/infra"));
        assert_eq!(cli.terraform_bin, PathBuf::from("terraform"));
        assert_eq!(cli.plan_file, "plan.txt");
        assert_eq!(cli.plan_json, "plan.json");
        assert!(!cli.verbose);
    }

    #[test]
    #[serial]
    fn test_working_dir_from_env_var_fallback() {
        let backup = std::env::var("TF_DATA_DIR").ok();
        unsafe {
            std::env::set_var("TF_DATA_DIR", "/env/infra");
        }

        let cli = Cli::parse_from(["tfdrift"]);

        unsafe {
            match backup {
                Some(dir) => std::env::set_var("TF_DATA_DIR", dir),
                None => std::env::remove_var("TF_DATA_DIR"),
            }
        }

        assert_eq!(cli.working_dir, PathBuf::from("/env/infra"));
    }

    #[test]
    #[serial]
    fn test_cli_flag_takes_precedence_over_env() {
        let backup = std::env::var("TF_DATA_DIR").ok();
        unsafe {
            std::env::set_var("TF_DATA_DIR", "/env/infra");
        }

        let cli = Cli::parse_from(["tfdrift", "--working-dir=/cli/infra"]);

        unsafe {
            match backup {
                Some(dir) => std::env::set_var("TF_DATA_DIR", dir),
                None => std::env::remove_var("TF_DATA_DIR"),
            }
        }

        assert_eq!(cli.working_dir, PathBuf::from("/cli/infra"));
    }

    #[test]
    #[serial]
    fn test_missing_working_dir_is_an_error() {
        let result = with_env_removed(&["TF_DATA_DIR"], || Cli::try_parse_from(["tfdrift"]));

        let err = result.unwrap_err();
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    #[serial]
    fn test_checker_config_carries_all_flags() {
        let cli = with_env_removed(&["TF_DATA_DIR", "TFDRIFT_TERRAFORM_BIN"], || {
            Cli::parse_from([
                "tfdrift",
                "--working-dir=/infra",
                "--terraform-bin=/usr/local/bin/terraform",
                "--plan-file=drift.tfplan",
                "--plan-json=drift.json",
                "-v",
            ])
        });

        let config = cli.checker_config();
        assert_eq!(config.working_dir, PathBuf::from("/infra"));
        assert_eq!(
            config.terraform_bin,
            PathBuf::from("/usr/local/bin/terraform")
        );
        assert_eq!(config.plan_file, "drift.tfplan");
        assert_eq!(config.plan_json_path(), PathBuf::from("/infra/drift.json"));
        assert!(cli.verbose);
    }
}
