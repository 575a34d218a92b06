//! `tslint.json`: the lint configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    /// `extends`, `linterOptions`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(
        default,
        rename = "rulesDirectory",
        skip_serializing_if = "Option::is_none"
    )]
    pub rules_directory: Option<OneOrMany>,

    /// Rule name to rule definition. Definitions are opaque.
    #[serde(default)]
    pub rules: IndexMap<String, Value>,
}

/// tslint accepts `rulesDirectory` as a single string or a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    pub fn contains(&self, entry: &str) -> bool {
        match self {
            OneOrMany::One(s) => s == entry,
            OneOrMany::Many(v) => v.iter().any(|s| s == entry),
        }
    }

    /// Append `entry` unless present; a single string becomes a list.
    pub fn push_unique(self, entry: &str) -> OneOrMany {
        if self.contains(entry) {
            return self;
        }
        let mut list = match self {
            OneOrMany::One(s) => vec![s],
            OneOrMany::Many(v) => v,
        };
        list.push(entry.to_string());
        OneOrMany::Many(list)
    }
}
