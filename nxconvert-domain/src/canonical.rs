//! Canonical values the conversion is responsible for putting in place.

use nxconvert_types::files;
use serde::Deserialize;
use serde_json::{Value, json};

/// Emitted when a project has no e2e target. Observed verbatim by callers.
pub const E2E_NOT_DECLARED: &str =
    "No e2e project was migrated because there was none declared in angular.json";

pub const MODULE_BOUNDARIES_RULE: &str = "nx-enforce-module-boundaries";

/// Where tslint finds the module boundary rule once `@nrwl/workspace` is installed.
pub const NX_RULES_DIRECTORY: &str = "node_modules/@nrwl/workspace/src/tslint";

/// Root configuration files every project implicitly depends on, in registry order.
pub const IMPLICIT_DEPENDENCIES: &[&str] = &[
    files::ANGULAR_JSON,
    files::PACKAGE_JSON,
    files::TSLINT_JSON,
    files::TSCONFIG_JSON,
    files::NX_JSON,
];

pub const RECOMMENDED_EXTENSIONS: &[&str] = &[
    "nrwl.angular-console",
    "angular.ng-template",
    "ms-vscode.vscode-typescript-tslint-plugin",
    "esbenp.prettier-vscode",
];

/// Reserved for the generated tooling; always written.
pub const SCRIPTS: &[(&str, &str)] = &[
    ("ng", "ng"),
    ("nx", "nx"),
    ("start", "ng serve"),
    ("build", "ng build"),
    ("test", "ng test"),
    ("lint", "nx workspace-lint && ng lint"),
    ("e2e", "ng e2e"),
    ("affected:apps", "nx affected:apps"),
    ("affected:libs", "nx affected:libs"),
    ("affected:build", "nx affected:build"),
    ("affected:e2e", "nx affected:e2e"),
    ("affected:test", "nx affected:test"),
    ("affected:lint", "nx affected:lint"),
    ("affected:dep-graph", "nx affected:dep-graph"),
    ("affected", "nx affected"),
    ("format", "nx format:write"),
    ("format:write", "nx format:write"),
    ("format:check", "nx format:check"),
    ("update", "ng update @nrwl/workspace"),
    ("update:check", "ng update"),
    ("dep-graph", "nx dep-graph"),
    ("workspace-schematic", "nx workspace-schematic"),
    ("help", "nx help"),
];

pub const PRETTIERRC: &str = "{\n  \"singleQuote\": true\n}\n";
pub const PRETTIERIGNORE: &str = "/dist\n/coverage\n";

/// Versions written for canonical dependencies that are absent.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CanonicalVersions {
    pub nx: String,
    pub angular_cli: String,
    pub ngrx: String,
    pub prettier: String,
}

impl Default for CanonicalVersions {
    fn default() -> Self {
        Self {
            nx: "8.4.13".to_string(),
            angular_cli: "8.3.14".to_string(),
            ngrx: "8.3.0".to_string(),
            prettier: "1.18.2".to_string(),
        }
    }
}

impl CanonicalVersions {
    pub fn dependencies(&self) -> Vec<(&'static str, String)> {
        vec![
            ("@nrwl/angular", self.nx.clone()),
            ("@ngrx/store", self.ngrx.clone()),
            ("@ngrx/effects", self.ngrx.clone()),
            ("@ngrx/router-store", self.ngrx.clone()),
        ]
    }

    pub fn dev_dependencies(&self) -> Vec<(&'static str, String)> {
        vec![
            ("@nrwl/workspace", self.nx.clone()),
            ("@angular/cli", self.angular_cli.clone()),
            ("@ngrx/store-devtools", self.ngrx.clone()),
            ("prettier", self.prettier.clone()),
        ]
    }
}

/// No allow list, one wildcard constraint: any tag may depend on any tag.
pub fn module_boundaries_rule() -> Value {
    json!([
        true,
        {
            "allow": [],
            "depConstraints": [
                { "sourceTag": "*", "onlyDependOnLibsWithTags": ["*"] }
            ]
        }
    ])
}
