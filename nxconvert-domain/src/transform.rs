//! Single-project workspace manifest → multi-project manifest.

use crate::layout::{E2eLayout, ProjectLayout};
use crate::paths::{self, PathKind};
use indexmap::IndexMap;
use nxconvert_types::workspace::{ProjectConfig, Target, TargetMap, WorkspaceManifest};
use serde_json::{Map, Value};

/// Rewrite every project of `manifest` into its `apps/<name>` layout.
///
/// Projects keep their manifest order; an `<name>-e2e` sibling follows its
/// application when (and only when) the application declared `e2e`.
/// Top-level keys other than `projects` are copied unchanged.
pub fn transform_workspace(
    manifest: &WorkspaceManifest,
    layouts: &[ProjectLayout],
) -> WorkspaceManifest {
    let mut projects = IndexMap::new();
    for (name, project) in &manifest.projects {
        let Some(layout) = layouts.iter().find(|l| l.name == *name) else {
            projects.insert(name.clone(), project.clone());
            continue;
        };
        let (app, sibling) = transform_project(project, layout);
        projects.insert(name.clone(), app);
        if let (Some(e2e), Some(sibling)) = (&layout.e2e, sibling) {
            projects.insert(e2e.project.clone(), sibling);
        }
    }
    WorkspaceManifest {
        extra: manifest.extra.clone(),
        projects,
    }
}

/// The converted project and, if it declared `e2e`, its sibling.
pub fn transform_project(
    project: &ProjectConfig,
    layout: &ProjectLayout,
) -> (ProjectConfig, Option<ProjectConfig>) {
    let key = project.targets_key();
    let original = project.target_map().cloned().unwrap_or_default();

    let mut targets = TargetMap::new();
    let mut e2e_lint_configs = Vec::new();
    for (name, target) in &original {
        if name == "e2e" && layout.e2e.is_some() {
            continue;
        }
        let mut rewritten = rewrite_target(name, target, layout);
        if name == "lint"
            && let Some(e2e) = &layout.e2e
        {
            e2e_lint_configs = split_off_e2e_ts_configs(&mut rewritten, e2e);
        }
        targets.insert(name.clone(), rewritten);
    }

    let mut app = ProjectConfig {
        root: layout.new_root.clone(),
        source_root: Some(layout.new_source_root.clone()),
        extra: project.extra.clone(),
        architect: None,
        targets: None,
    };
    if project.target_map().is_some() {
        app.set_target_map(key, targets);
    }

    let sibling = layout.e2e.as_ref().map(|e2e| {
        let mut sibling_targets = TargetMap::new();
        if let Some(target) = original.get("e2e") {
            let mut e2e_target = rewrite_target("e2e", target, layout);
            retarget_dev_server(&mut e2e_target, &layout.name);
            sibling_targets.insert("e2e".to_string(), e2e_target);
        }
        if let Some(lint) = original.get("lint") {
            sibling_targets.insert(
                "lint".to_string(),
                e2e_lint_target(lint, e2e, e2e_lint_configs, layout),
            );
        }

        let mut extra = Map::new();
        extra.insert(
            "projectType".to_string(),
            Value::String("application".to_string()),
        );
        let mut sibling = ProjectConfig {
            root: e2e.new_root.clone(),
            source_root: Some(paths::join(&e2e.new_root, "src")),
            extra,
            architect: None,
            targets: None,
        };
        sibling.set_target_map(key, sibling_targets);
        sibling
    });

    (app, sibling)
}

/// Rewrite path-valued options of one target, overlays included.
/// `builder` and every other key are copied as-is.
pub fn rewrite_target(target_name: &str, target: &Target, layout: &ProjectLayout) -> Target {
    Target {
        builder: target.builder.clone(),
        options: rewrite_options(target_name, &target.options, layout),
        configurations: target.configurations.as_ref().map(|confs| {
            confs
                .iter()
                .map(|(name, overlay)| (name.clone(), rewrite_options(target_name, overlay, layout)))
                .collect()
        }),
        extra: target.extra.clone(),
    }
}

fn rewrite_options(
    target_name: &str,
    options: &Map<String, Value>,
    layout: &ProjectLayout,
) -> Map<String, Value> {
    options
        .iter()
        .map(|(name, value)| {
            let kind = paths::path_kind(target_name, name).unwrap_or(PathKind::Source);
            (name.clone(), rewrite_value(value, kind, layout))
        })
        .collect()
}

fn rewrite_value(value: &Value, kind: PathKind, layout: &ProjectLayout) -> Value {
    match value {
        Value::String(s) => {
            let rewritten = match kind {
                PathKind::Output => layout.rewrite_output_path(s),
                PathKind::Source => layout.rewrite_path(s),
            };
            rewritten.map(Value::String).unwrap_or_else(|| value.clone())
        }
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|v| rewrite_value(v, kind, layout))
                .collect(),
        ),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if paths::PATH_OBJECT_FIELDS.contains(&k.as_str()) {
                        rewrite_value(v, PathKind::Source, layout)
                    } else {
                        v.clone()
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        _ => value.clone(),
    }
}

/// Remove the e2e tree's entries from an (already rewritten) lint
/// `tsConfig` and return them.
fn split_off_e2e_ts_configs(lint: &mut Target, e2e: &E2eLayout) -> Vec<String> {
    let under_e2e = |s: &str| paths::strip_dir(s, &e2e.new_root).is_some();
    let mut taken = Vec::new();
    match lint.options.get_mut("tsConfig") {
        Some(Value::Array(items)) => {
            items.retain(|v| match v.as_str() {
                Some(s) if under_e2e(s) => {
                    taken.push(s.to_string());
                    false
                }
                _ => true,
            });
            if items.is_empty() {
                lint.options.shift_remove("tsConfig");
            }
        }
        Some(Value::String(s)) if under_e2e(s) => {
            taken.push(s.clone());
            lint.options.shift_remove("tsConfig");
        }
        _ => {}
    }
    taken
}

fn e2e_lint_target(
    app_lint: &Target,
    e2e: &E2eLayout,
    ts_configs: Vec<String>,
    layout: &ProjectLayout,
) -> Target {
    let ts_configs = if ts_configs.is_empty() {
        layout
            .tsconfigs
            .iter()
            .filter(|(_, new)| paths::strip_dir(new, &e2e.new_root).is_some())
            .map(|(_, new)| new.clone())
            .take(1)
            .collect()
    } else {
        ts_configs
    };

    let mut options = Map::new();
    match ts_configs.len() {
        0 => {}
        1 => {
            options.insert("tsConfig".to_string(), Value::String(ts_configs[0].clone()));
        }
        _ => {
            options.insert(
                "tsConfig".to_string(),
                Value::Array(ts_configs.into_iter().map(Value::String).collect()),
            );
        }
    }
    if let Some(exclude) = app_lint.options.get("exclude") {
        options.insert("exclude".to_string(), exclude.clone());
    }

    Target {
        builder: app_lint.builder.clone(),
        options,
        configurations: None,
        extra: Map::new(),
    }
}

/// Point `devServerTarget` (`project:target[:configuration]`) at the
/// application by name.
fn retarget_dev_server(target: &mut Target, project: &str) {
    fn retarget(options: &mut Map<String, Value>, project: &str) {
        if let Some(Value::String(s)) = options.get_mut("devServerTarget")
            && let Some((_, rest)) = s.split_once(':')
        {
            *s = format!("{}:{}", project, rest);
        }
    }
    retarget(&mut target.options, project);
    if let Some(confs) = target.configurations.as_mut() {
        for overlay in confs.values_mut() {
            retarget(overlay, project);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::E2eLayout;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn root_layout(with_e2e: bool) -> ProjectLayout {
        ProjectLayout {
            name: "proj".to_string(),
            old_root: String::new(),
            old_source_root: "src".to_string(),
            new_root: "apps/proj".to_string(),
            new_source_root: "apps/proj/src".to_string(),
            root_files: vec!["tsconfig.app.json".to_string()],
            tsconfigs: vec![],
            e2e: with_e2e.then(|| E2eLayout {
                project: "proj-e2e".to_string(),
                old_dir: "e2e".to_string(),
                new_root: "apps/proj-e2e".to_string(),
            }),
            is_e2e_project: false,
        }
    }

    #[test]
    fn unknown_builder_gets_generic_rewrite() {
        let target: Target = serde_json::from_value(json!({
            "builder": "@custom/builder:thing",
            "options": { "entry": "src/server.ts", "port": 4200, "flag": true }
        }))
        .unwrap();
        let out = rewrite_target("server", &target, &root_layout(false));
        assert_eq!(out.builder, "@custom/builder:thing");
        assert_eq!(out.options["entry"], "apps/proj/src/server.ts");
        assert_eq!(out.options["port"], 4200);
        assert_eq!(out.options["flag"], true);
    }

    #[test]
    fn configurations_are_rewritten_recursively() {
        let target: Target = serde_json::from_value(json!({
            "builder": "b",
            "options": {
                "assets": ["src/favicon.ico", { "glob": "**/*", "input": "src/assets", "output": "/assets" }]
            },
            "configurations": {
                "production": {
                    "fileReplacements": [
                        { "replace": "src/environments/environment.ts", "with": "src/environments/environment.prod.ts" }
                    ],
                    "budgets": [{ "type": "initial", "maximumWarning": "2mb" }]
                }
            }
        }))
        .unwrap();
        let out = rewrite_target("build", &target, &root_layout(false));
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({
                "builder": "b",
                "options": {
                    "assets": ["apps/proj/src/favicon.ico", { "glob": "**/*", "input": "apps/proj/src/assets", "output": "/assets" }]
                },
                "configurations": {
                    "production": {
                        "fileReplacements": [
                            { "replace": "apps/proj/src/environments/environment.ts", "with": "apps/proj/src/environments/environment.prod.ts" }
                        ],
                        "budgets": [{ "type": "initial", "maximumWarning": "2mb" }]
                    }
                }
            })
        );
    }

    #[test]
    fn no_e2e_target_means_no_sibling() {
        let project: ProjectConfig = serde_json::from_value(json!({
            "root": "",
            "sourceRoot": "src",
            "architect": {
                "lint": { "builder": "l", "options": { "tsConfig": ["tsconfig.app.json"] } }
            }
        }))
        .unwrap();
        let (app, sibling) = transform_project(&project, &root_layout(false));
        assert!(sibling.is_none());
        assert!(app.target("e2e").is_none());
        assert_eq!(
            app.target("lint").unwrap().options["tsConfig"],
            json!(["apps/proj/tsconfig.app.json"])
        );
    }

    #[test]
    fn app_lint_drops_ts_config_when_every_entry_is_e2e() {
        let project: ProjectConfig = serde_json::from_value(json!({
            "root": "",
            "sourceRoot": "src",
            "architect": {
                "lint": { "builder": "l", "options": { "tsConfig": ["e2e/tsconfig.json"] } },
                "e2e": { "builder": "p", "options": { "protractorConfig": "e2e/protractor.conf.js" } }
            }
        }))
        .unwrap();
        let (app, sibling) = transform_project(&project, &root_layout(true));

        assert_eq!(
            serde_json::to_value(app.target("lint").unwrap()).unwrap(),
            json!({ "builder": "l" })
        );
        assert_eq!(
            sibling.unwrap().target("lint").unwrap().options["tsConfig"],
            "apps/proj-e2e/tsconfig.json"
        );
    }

    #[test]
    fn e2e_moves_to_sibling_and_references_app_by_name() {
        let project: ProjectConfig = serde_json::from_value(json!({
            "root": "",
            "sourceRoot": "src",
            "targets": {
                "lint": { "builder": "l", "options": {
                    "tsConfig": ["tsconfig.app.json", "e2e/tsconfig.json"],
                    "exclude": ["**/node_modules/**"]
                }},
                "e2e": {
                    "builder": "p",
                    "options": { "protractorConfig": "e2e/protractor.conf.js", "devServerTarget": "old:serve" },
                    "configurations": { "production": { "devServerTarget": "old:serve:production" } }
                }
            }
        }))
        .unwrap();
        let (app, sibling) = transform_project(&project, &root_layout(true));
        let sibling = sibling.unwrap();

        assert!(app.targets.is_some());
        assert!(app.architect.is_none());
        assert!(app.target("e2e").is_none());
        assert_eq!(
            app.target("lint").unwrap().options["tsConfig"],
            json!(["apps/proj/tsconfig.app.json"])
        );

        assert_eq!(sibling.root, "apps/proj-e2e");
        assert!(sibling.targets.is_some());
        let e2e = sibling.target("e2e").unwrap();
        assert_eq!(e2e.options["protractorConfig"], "apps/proj-e2e/protractor.conf.js");
        assert_eq!(e2e.options["devServerTarget"], "proj:serve");
        assert_eq!(
            e2e.configurations.as_ref().unwrap()["production"]["devServerTarget"],
            "proj:serve:production"
        );
        let lint = sibling.target("lint").unwrap();
        assert_eq!(
            serde_json::to_value(lint).unwrap(),
            json!({
                "builder": "l",
                "options": { "tsConfig": "apps/proj-e2e/tsconfig.json", "exclude": ["**/node_modules/**"] }
            })
        );
    }
}
