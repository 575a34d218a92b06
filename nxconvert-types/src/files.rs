//! Well-known file and directory names, relative to the workspace root.

pub const PACKAGE_JSON: &str = "package.json";
pub const ANGULAR_JSON: &str = "angular.json";
pub const NX_JSON: &str = "nx.json";
pub const TSLINT_JSON: &str = "tslint.json";
pub const TSCONFIG_JSON: &str = "tsconfig.json";
pub const VSCODE_EXTENSIONS_JSON: &str = ".vscode/extensions.json";
pub const PRETTIERRC: &str = ".prettierrc";
pub const PRETTIERIGNORE: &str = ".prettierignore";
pub const CONFIG_FILE_NAME: &str = "nxconvert.toml";

/// Directory that receives every converted application.
pub const APPS_DIR: &str = "apps";

/// Suffix of the sibling project created for a declared e2e target.
pub const E2E_SUFFIX: &str = "-e2e";

/// Default primary source directory of a CLI application.
pub const DEFAULT_SOURCE_DIR: &str = "src";
