use crate::error::PreconditionError;
use crate::layout::ProjectLayout;
use crate::paths::{self, strip_dir};
use crate::ports::RepoView;
use camino::Utf8Path;
use nxconvert_types::files;
use nxconvert_types::lint::LintConfig;
use nxconvert_types::package::PackageManifest;
use nxconvert_types::recommendations::ExtensionRecommendations;
use nxconvert_types::workspace::WorkspaceManifest;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    /// Primary source directory, relative to the workspace root.
    pub source_dir: String,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            source_dir: files::DEFAULT_SOURCE_DIR.to_string(),
        }
    }
}

/// A workspace that passed every check, with the documents the planner
/// merges into already parsed.
#[derive(Debug, Clone)]
pub struct ValidatedWorkspace {
    pub manifest: WorkspaceManifest,
    pub layouts: Vec<ProjectLayout>,
    pub package: PackageManifest,
    pub lint: Option<LintConfig>,
    pub recommendations: Option<ExtensionRecommendations>,
}

impl ValidatedWorkspace {
    /// Project names after conversion, each app followed by its e2e sibling.
    pub fn converted_project_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        for layout in &self.layouts {
            names.push(layout.name.as_str());
            if let Some(e2e) = &layout.e2e {
                names.push(e2e.project.as_str());
            }
        }
        names
    }

    pub fn layout(&self, project: &str) -> Option<&ProjectLayout> {
        self.layouts.iter().find(|l| l.name == project)
    }
}

/// Check that the workspace can be converted. Reads only; nothing on disk
/// changes whether this succeeds or not.
///
/// Checks run in a fixed order and the first failure is returned:
/// package manifest, source directory, workspace manifest, e2e directories,
/// relocation destinations, then every JSON document a later stage reads.
pub fn validate_workspace(
    repo: &dyn RepoView,
    opts: &ValidateOptions,
) -> Result<ValidatedWorkspace, PreconditionError> {
    if !repo.is_file(Utf8Path::new(files::PACKAGE_JSON)) {
        return Err(PreconditionError::MissingPackageManifest {
            path: files::PACKAGE_JSON.to_string(),
        });
    }

    let source_dir = paths::normalize(&opts.source_dir);
    if !repo.is_dir(Utf8Path::new(&source_dir)) {
        return Err(PreconditionError::MissingSourceDir { path: source_dir });
    }

    let manifest = read_workspace_manifest(repo)?;
    for (name, project) in &manifest.projects {
        let dir = if project.root.is_empty() {
            paths::normalize(&project.effective_source_root())
        } else {
            paths::normalize(&project.root)
        };
        if !dir.is_empty() && !repo.is_dir(Utf8Path::new(&dir)) {
            debug!(project = %name, path = %dir, "project directory missing");
            return Err(PreconditionError::MissingSourceDir { path: dir });
        }
    }

    let layouts: Vec<ProjectLayout> = manifest
        .projects
        .iter()
        .map(|(name, project)| ProjectLayout::discover(name, project, repo))
        .collect();

    for layout in &layouts {
        if let Some(e2e) = &layout.e2e
            && !repo.is_dir(Utf8Path::new(&e2e.old_dir))
        {
            return Err(PreconditionError::MissingE2eDir {
                project: layout.name.clone(),
                path: e2e.old_dir.clone(),
            });
        }
    }

    check_destinations(repo, &manifest, &layouts)?;

    let package = parse_required::<PackageManifest>(repo, files::PACKAGE_JSON)?;
    let lint = parse_optional::<LintConfig>(repo, files::TSLINT_JSON)?;
    let recommendations =
        parse_optional::<ExtensionRecommendations>(repo, files::VSCODE_EXTENSIONS_JSON)?;
    parse_optional::<serde_json::Value>(repo, files::TSCONFIG_JSON)?;

    debug!(projects = layouts.len(), "workspace validated");
    Ok(ValidatedWorkspace {
        manifest,
        layouts,
        package,
        lint,
        recommendations,
    })
}

fn read_workspace_manifest(repo: &dyn RepoView) -> Result<WorkspaceManifest, PreconditionError> {
    if !repo.is_file(Utf8Path::new(files::ANGULAR_JSON)) {
        return Err(PreconditionError::MissingWorkspaceManifest {
            path: files::ANGULAR_JSON.to_string(),
        });
    }
    let manifest: WorkspaceManifest =
        parse_required(repo, files::ANGULAR_JSON).map_err(|e| match e {
            PreconditionError::InvalidJson { path, message } => {
                PreconditionError::InvalidWorkspaceManifest { path, message }
            }
            other => other,
        })?;
    if manifest.projects.is_empty() {
        return Err(PreconditionError::NoProjects {
            path: files::ANGULAR_JSON.to_string(),
        });
    }
    Ok(manifest)
}

fn check_destinations(
    repo: &dyn RepoView,
    manifest: &WorkspaceManifest,
    layouts: &[ProjectLayout],
) -> Result<(), PreconditionError> {
    if repo.exists(Utf8Path::new(files::NX_JSON)) {
        return Err(PreconditionError::AlreadyConverted {
            path: files::NX_JSON.to_string(),
        });
    }

    for layout in layouts {
        let mut destinations = vec![layout.new_root.as_str()];
        if let Some(e2e) = &layout.e2e {
            if manifest.projects.contains_key(&e2e.project) {
                return Err(PreconditionError::ProjectNameTaken {
                    name: e2e.project.clone(),
                });
            }
            destinations.push(e2e.new_root.as_str());
        }
        for dest in destinations {
            if repo.exists(Utf8Path::new(dest)) {
                return Err(PreconditionError::DestinationExists {
                    project: layout.name.clone(),
                    path: dest.to_string(),
                });
            }
        }
    }

    let mut claimed: Vec<(String, &str)> = Vec::new();
    for layout in layouts {
        for source in layout.move_sources() {
            let clash = claimed.iter().find(|(other, _)| {
                strip_dir(&source, other).is_some() || strip_dir(other, &source).is_some()
            });
            if let Some((_, owner)) = clash {
                return Err(PreconditionError::OverlappingSources {
                    path: source,
                    first: owner.to_string(),
                    second: layout.name.clone(),
                });
            }
            claimed.push((source, layout.name.as_str()));
        }
    }
    Ok(())
}

fn parse_required<T: DeserializeOwned>(
    repo: &dyn RepoView,
    path: &str,
) -> Result<T, PreconditionError> {
    let contents =
        repo.read_to_string(Utf8Path::new(path))
            .map_err(|e| PreconditionError::Unreadable {
                path: path.to_string(),
                message: format!("{:#}", e),
            })?;
    serde_json::from_str(&contents).map_err(|e| PreconditionError::InvalidJson {
        path: path.to_string(),
        message: e.to_string(),
    })
}

fn parse_optional<T: DeserializeOwned>(
    repo: &dyn RepoView,
    path: &str,
) -> Result<Option<T>, PreconditionError> {
    if !repo.is_file(Utf8Path::new(path)) {
        return Ok(None);
    }
    parse_required(repo, path).map(Some)
}
