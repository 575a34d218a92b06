//! `angular.json`: the workspace manifest.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Targets of a project, keyed by target name (`build`, `serve`, `test`, ...).
pub type TargetMap = IndexMap<String, Target>;

/// Option overlays keyed by configuration name (`production`, ...).
pub type ConfigurationMap = IndexMap<String, Map<String, Value>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkspaceManifest {
    /// `$schema`, `version`, `newProjectRoot`, `defaultProject`, `cli`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(default)]
    pub projects: IndexMap<String, ProjectConfig>,
}

impl WorkspaceManifest {
    pub fn default_project(&self) -> Option<&str> {
        self.extra.get("defaultProject").and_then(Value::as_str)
    }
}

/// Which key a project stores its targets under.
///
/// Angular CLI workspaces use `architect`; newer tooling writes `targets`.
/// The converter keeps whichever the input used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetsKey {
    #[default]
    Architect,
    Targets,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub root: String,

    #[serde(
        default,
        rename = "sourceRoot",
        skip_serializing_if = "Option::is_none"
    )]
    pub source_root: Option<String>,

    /// `projectType`, `prefix`, `schematics`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub architect: Option<TargetMap>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<TargetMap>,
}

impl ProjectConfig {
    pub fn targets_key(&self) -> TargetsKey {
        if self.architect.is_none() && self.targets.is_some() {
            TargetsKey::Targets
        } else {
            TargetsKey::Architect
        }
    }

    pub fn target_map(&self) -> Option<&TargetMap> {
        match self.targets_key() {
            TargetsKey::Architect => self.architect.as_ref(),
            TargetsKey::Targets => self.targets.as_ref(),
        }
    }

    pub fn target(&self, name: &str) -> Option<&Target> {
        self.target_map().and_then(|m| m.get(name))
    }

    pub fn set_target_map(&mut self, key: TargetsKey, map: TargetMap) {
        match key {
            TargetsKey::Architect => {
                self.architect = Some(map);
                self.targets = None;
            }
            TargetsKey::Targets => {
                self.targets = Some(map);
                self.architect = None;
            }
        }
    }

    /// Source root, falling back to `<root>/src` the way the CLI does.
    pub fn effective_source_root(&self) -> String {
        match &self.source_root {
            Some(s) => s.trim_end_matches('/').to_string(),
            None if self.root.is_empty() => "src".to_string(),
            None => format!("{}/src", self.root.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub builder: String,

    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub options: Map<String, Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurations: Option<ConfigurationMap>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Target {
    pub fn option_str(&self, name: &str) -> Option<&str> {
        self.options.get(name).and_then(Value::as_str)
    }
}
