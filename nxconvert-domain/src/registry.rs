use crate::canonical;
use nxconvert_types::registry::{ProjectRegistry, RegistryProject, WILDCARD};
use nxconvert_types::workspace::WorkspaceManifest;

/// Build `nx.json` for the converted project names, in order.
pub fn build_registry<'a>(
    npm_scope: &str,
    projects: impl IntoIterator<Item = &'a str>,
) -> ProjectRegistry {
    ProjectRegistry {
        npm_scope: npm_scope.to_string(),
        implicit_dependencies: canonical::IMPLICIT_DEPENDENCIES
            .iter()
            .map(|file| (file.to_string(), WILDCARD.to_string()))
            .collect(),
        projects: projects
            .into_iter()
            .map(|name| (name.to_string(), RegistryProject::default()))
            .collect(),
    }
}

/// Scope to use when none was supplied: `defaultProject`, else the first
/// project.
pub fn default_npm_scope(manifest: &WorkspaceManifest) -> Option<String> {
    manifest
        .default_project()
        .or_else(|| manifest.projects.keys().next().map(String::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn registry_lists_every_project_with_empty_tags() {
        let registry = build_registry("projscope", ["proj", "proj-e2e"]);
        assert_eq!(
            serde_json::to_value(&registry).unwrap(),
            json!({
                "npmScope": "projscope",
                "implicitDependencies": {
                    "angular.json": "*",
                    "package.json": "*",
                    "tslint.json": "*",
                    "tsconfig.json": "*",
                    "nx.json": "*"
                },
                "projects": {
                    "proj": { "tags": [] },
                    "proj-e2e": { "tags": [] }
                }
            })
        );
        let keys: Vec<_> = registry.implicit_dependencies.keys().collect();
        assert_eq!(keys, ["angular.json", "package.json", "tslint.json", "tsconfig.json", "nx.json"]);
    }

    #[test]
    fn scope_falls_back_to_first_project() {
        let manifest: WorkspaceManifest = serde_json::from_value(json!({
            "projects": { "first": { "root": "" }, "second": { "root": "x" } }
        }))
        .unwrap();
        assert_eq!(default_npm_scope(&manifest).as_deref(), Some("first"));

        let manifest: WorkspaceManifest = serde_json::from_value(json!({
            "projects": { "first": { "root": "" }, "second": { "root": "x" } },
            "defaultProject": "second"
        }))
        .unwrap();
        assert_eq!(default_npm_scope(&manifest).as_deref(), Some("second"));
    }
}
