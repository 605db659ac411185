use anyhow::{Context, Result};
use serde_json::Value;
use std::cell::OnceCell;
use std::path::{Path, PathBuf};

/// State file Terraform writes next to the configuration
pub const STATE_FILE: &str = "terraform.tfstate";

/// A resource recorded in Terraform state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateResource {
    pub resource_type: String,
    pub name: String,
}

/// Caller-owned view of a local Terraform state file
///
/// The file is read at most once, on the first lookup. A missing or
/// unreadable state file counts as "nothing imported yet".
pub struct TerraformState {
    state_path: PathBuf,
    resources: OnceCell<Vec<StateResource>>,
}

impl TerraformState {
    /// State handle for the `terraform.tfstate` inside `work_dir`
    pub fn in_dir(work_dir: &Path) -> Self {
        Self::new(&work_dir.join(STATE_FILE))
    }

    pub fn new(state_path: &Path) -> Self {
        Self {
            state_path: state_path.to_path_buf(),
            resources: OnceCell::new(),
        }
    }

    /// Whether a resource with this type and name was already imported
    pub fn contains(&self, resource_type: &str, name: &str) -> bool {
        self.resources()
            .iter()
            .any(|r| r.resource_type == resource_type && r.name == name)
    }

    fn resources(&self) -> &[StateResource] {
        self.resources.get_or_init(|| match self.parse() {
            Ok(resources) => resources,
            Err(err) => {
                tracing::warn!(
                    path = %self.state_path.display(),
                    "treating state as empty: {:#}",
                    err
                );
                Vec::new()
            }
        })
    }

    fn parse(&self) -> Result<Vec<StateResource>> {
        let content = std::fs::read_to_string(&self.state_path).with_context(|| {
            format!("Failed to read state file: {}", self.state_path.display())
        })?;
        let state: Value =
            serde_json::from_str(&content).context("Failed to parse state file as JSON")?;

        Ok(Self::extract_resources(&state))
    }

    /// Managed resources from the `resources` array of a state document
    fn extract_resources(state: &Value) -> Vec<StateResource> {
        let Some(resources) = state.get("resources").and_then(|r| r.as_array()) else {
            return Vec::new();
        };

        resources
            .iter()
            .filter(|r| r.get("mode").and_then(|m| m.as_str()).unwrap_or("managed") == "managed")
            .filter_map(|r| {
                Some(StateResource {
                    resource_type: r.get("type")?.as_str()?.to_string(),
                    name: r.get("name")?.as_str()?.to_string(),
                })
            })
            .collect()
    }
}
