//! `nx.json`: the project registry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Marker meaning "every project depends on this file".
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRegistry {
    pub npm_scope: String,

    #[serde(default)]
    pub implicit_dependencies: IndexMap<String, String>,

    #[serde(default)]
    pub projects: IndexMap<String, RegistryProject>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegistryProject {
    #[serde(default)]
    pub tags: Vec<String>,
}
