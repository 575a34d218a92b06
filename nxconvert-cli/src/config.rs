//! Configuration file loading for nxconvert.
//!
//! Discovers and loads `nxconvert.toml` from the workspace root.
//! Merges config file settings with CLI arguments (CLI takes precedence).

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use nxconvert_core::CanonicalVersions;
use nxconvert_types::files::{CONFIG_FILE_NAME, DEFAULT_SOURCE_DIR};
use serde::Deserialize;
use tracing::debug;

/// Top-level configuration from nxconvert.toml.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NxconvertConfig {
    /// Scope for `nx.json` when `--npm-scope` is not given.
    pub npm_scope: Option<String>,

    /// Primary source directory checked before converting.
    pub source_dir: Option<String>,

    /// Versions written for canonical dependencies that are missing.
    pub versions: CanonicalVersions,
}

pub fn discover_config(repo_root: &Utf8Path) -> Option<Utf8PathBuf> {
    let config_path = repo_root.join(CONFIG_FILE_NAME);
    if config_path.is_file() {
        debug!("found config file at {}", config_path);
        Some(config_path)
    } else {
        debug!("no config file found at {}", config_path);
        None
    }
}

pub fn load_config(path: &Utf8Path) -> anyhow::Result<NxconvertConfig> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read config file {}", path))?;
    parse_config(&contents).with_context(|| format!("parse config file {}", path))
}

pub fn parse_config(contents: &str) -> anyhow::Result<NxconvertConfig> {
    let config: NxconvertConfig = toml::from_str(contents).context("invalid TOML")?;
    Ok(config)
}

/// Load config from the workspace root, or return the default if there is none.
pub fn load_or_default(repo_root: &Utf8Path) -> anyhow::Result<NxconvertConfig> {
    match discover_config(repo_root) {
        Some(path) => load_config(&path),
        None => Ok(NxconvertConfig::default()),
    }
}

/// Config file and CLI arguments combined.
#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub npm_scope: Option<String>,
    pub source_dir: String,
    pub versions: CanonicalVersions,
}

pub struct ConfigMerger {
    config: NxconvertConfig,
}

impl ConfigMerger {
    pub fn new(config: NxconvertConfig) -> Self {
        Self { config }
    }

    /// A scope given on the command line replaces the configured one.
    pub fn merge_add_args(self, cli_npm_scope: Option<&str>) -> MergedConfig {
        let npm_scope = cli_npm_scope
            .map(str::to_string)
            .or(self.config.npm_scope);

        MergedConfig {
            npm_scope,
            source_dir: self
                .config
                .source_dir
                .unwrap_or_else(|| DEFAULT_SOURCE_DIR.to_string()),
            versions: self.config.versions,
        }
    }
}
