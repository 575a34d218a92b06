//! `package.json`: the package manifest.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const SCRIPTS: &str = "scripts";
const DEPENDENCIES: &str = "dependencies";
const DEV_DEPENDENCIES: &str = "devDependencies";

/// Package manifest with the three sections the converter merges into.
///
/// Everything else (`name`, `version`, `private`, `description`, ...) is kept
/// verbatim in `extra`. Top-level keys are written back in the order they
/// were read; sections that did not exist are appended at the end.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "Map<String, Value>",
    into = "Map<String, Value>"
)]
pub struct PackageManifest {
    pub extra: Map<String, Value>,
    pub scripts: Option<Map<String, Value>>,
    pub dependencies: Option<Map<String, Value>>,
    pub dev_dependencies: Option<Map<String, Value>>,

    /// Top-level keys as read.
    key_order: Vec<String>,
}

impl TryFrom<Map<String, Value>> for PackageManifest {
    type Error = String;

    fn try_from(doc: Map<String, Value>) -> Result<Self, Self::Error> {
        let mut pkg = PackageManifest {
            key_order: doc.keys().cloned().collect(),
            ..PackageManifest::default()
        };
        for (key, value) in doc {
            let slot = match key.as_str() {
                SCRIPTS => &mut pkg.scripts,
                DEPENDENCIES => &mut pkg.dependencies,
                DEV_DEPENDENCIES => &mut pkg.dev_dependencies,
                _ => {
                    pkg.extra.insert(key, value);
                    continue;
                }
            };
            match value {
                Value::Object(section) => *slot = Some(section),
                Value::Null => {}
                _ => return Err(format!("`{}` must be an object", key)),
            }
        }
        Ok(pkg)
    }
}

impl From<PackageManifest> for Map<String, Value> {
    fn from(pkg: PackageManifest) -> Self {
        let PackageManifest {
            mut extra,
            scripts,
            dependencies,
            dev_dependencies,
            key_order,
        } = pkg;
        let mut sections = [
            (SCRIPTS, scripts),
            (DEPENDENCIES, dependencies),
            (DEV_DEPENDENCIES, dev_dependencies),
        ];

        let mut out = Map::new();
        for key in &key_order {
            if let Some((_, section)) = sections.iter_mut().find(|(name, _)| *name == key.as_str())
            {
                if let Some(section) = section.take() {
                    out.insert(key.clone(), Value::Object(section));
                }
            } else if let Some(value) = extra.shift_remove(key) {
                out.insert(key.clone(), value);
            }
        }
        out.extend(extra);
        for (name, section) in sections {
            if let Some(section) = section {
                out.insert(name.to_string(), Value::Object(section));
            }
        }
        out
    }
}
