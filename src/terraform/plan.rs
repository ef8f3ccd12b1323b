use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::DriftError;

/// The fields of `terraform show -json` that decide the drift verdict.
///
/// Unknown fields are ignored; Terraform adds to this document between
/// releases. Only `errored`, `complete` and `applyable` can fail the parse; the
/// informational fields fall back to empty when their shape is unexpected.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PlanResult {
    /// `null` reads the same as missing, so it counts as errored. Python-style
    /// `.get("errored", True)` would treat an explicit `null` as not errored;
    /// this parser fails closed instead.
    #[serde(default)]
    pub errored: Option<bool>,
    #[serde(default)]
    pub complete: Option<bool>,
    /// Kept raw: anything other than a JSON boolean is an indeterminate status.
    #[serde(default)]
    pub applyable: Option<serde_json::Value>,
    #[serde(default, deserialize_with = "lenient")]
    pub format_version: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub terraform_version: Option<String>,
    /// Entries that do not match the expected shape are skipped.
    #[serde(default, deserialize_with = "lenient_list")]
    pub resource_changes: Vec<ResourceChange>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Array(entries) => entries,
        _ => return Ok(Vec::new()),
    };
    Ok(entries
        .into_iter()
        .filter_map(|entry| serde_json::from_value(entry).ok())
        .collect())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResourceChange {
    pub address: String,
    #[serde(default)]
    pub change: Change,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Change {
    #[serde(default)]
    pub actions: Vec<String>,
}

impl PlanResult {
    pub async fn load(path: &Path) -> Result<Self, DriftError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|source| DriftError::PlanRead {
                path: path.to_path_buf(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| DriftError::PlanParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Missing means errored.
    pub fn is_errored(&self) -> bool {
        self.errored.unwrap_or(true)
    }

    /// Missing means incomplete.
    pub fn is_complete(&self) -> bool {
        self.complete.unwrap_or(false)
    }

    pub fn applyable(&self) -> Option<bool> {
        self.applyable.as_ref().and_then(serde_json::Value::as_bool)
    }

    /// Resource changes that would actually modify infrastructure.
    pub fn drifted_resources(&self) -> impl Iterator<Item = &ResourceChange> {
        self.resource_changes.iter().filter(|rc| rc.is_drift())
    }
}

impl ResourceChange {
    pub fn is_drift(&self) -> bool {
        match self.change.actions.as_slice() {
            [] => false,
            [action] => action != "no-op" && action != "read",
            _ => true,
        }
    }

    /// `create`, `update`, `delete`, or `delete/create` for replacements.
    pub fn action_label(&self) -> String {
        self.change.actions.join("/")
    }
}
