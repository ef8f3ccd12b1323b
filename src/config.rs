use std::path::PathBuf;

pub const DEFAULT_TERRAFORM_BIN: &str = "terraform";
pub const DEFAULT_PLAN_FILE: &str = "plan.txt";
pub const DEFAULT_PLAN_JSON: &str = "plan.json";

/// Everything the drift checker needs, resolved once at process entry.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    pub working_dir: PathBuf,
    pub terraform_bin: PathBuf,
    /// Plan artifact name, relative to `working_dir`.
    pub plan_file: String,
    /// JSON rendering name, relative to `working_dir`.
    pub plan_json: String,
}

impl CheckerConfig {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
            terraform_bin: PathBuf::from(DEFAULT_TERRAFORM_BIN),
            plan_file: DEFAULT_PLAN_FILE.to_string(),
            plan_json: DEFAULT_PLAN_JSON.to_string(),
        }
    }

    pub fn plan_json_path(&self) -> PathBuf {
        self.working_dir.join(&self.plan_json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_uses_defaults() {
        let config = CheckerConfig::new("/infra");
        assert_eq!(config.working_dir, PathBuf::from("/infra"));
        assert_eq!(config.terraform_bin, PathBuf::from("terraform"));
        assert_eq!(config.plan_file, "plan.txt");
        assert_eq!(config.plan_json, "plan.json");
    }

    #[test]
    fn test_plan_json_path_is_inside_working_dir() {
        let config = CheckerConfig::new("/infra/prod");
        assert_eq!(
            config.plan_json_path(),
            PathBuf::from("/infra/prod/plan.json")
        );
    }
}
