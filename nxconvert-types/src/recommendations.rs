//! `.vscode/extensions.json`: editor extension recommendations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtensionRecommendations {
    /// Ordered and duplicate-free.
    #[serde(default)]
    pub recommendations: Vec<String>,

    /// `unwantedRecommendations`, ...
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
