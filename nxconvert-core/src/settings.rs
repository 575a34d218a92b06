//! Clap-free settings for the conversion pipeline.

use camino::Utf8PathBuf;
use nxconvert_domain::CanonicalVersions;
use nxconvert_types::files;

/// The only package `nxconvert add` knows how to add.
pub const SUPPORTED_PACKAGE: &str = "@nrwl/workspace";

#[derive(Debug, Clone)]
pub struct ConvertSettings {
    pub repo_root: Utf8PathBuf,
    pub package: String,

    /// Scope written to `nx.json`. Defaults to the workspace's default project.
    pub npm_scope: Option<String>,
    pub source_dir: String,
    pub versions: CanonicalVersions,

    pub dry_run: bool,

    /// Recorded only; nxconvert never installs packages.
    pub skip_install: bool,

    /// Where plan and apply artifacts go, if anywhere.
    pub out_dir: Option<Utf8PathBuf>,
}

impl Default for ConvertSettings {
    fn default() -> Self {
        Self {
            repo_root: Utf8PathBuf::from("."),
            package: SUPPORTED_PACKAGE.to_string(),
            npm_scope: None,
            source_dir: files::DEFAULT_SOURCE_DIR.to_string(),
            versions: CanonicalVersions::default(),
            dry_run: false,
            skip_install: false,
            out_dir: None,
        }
    }
}
