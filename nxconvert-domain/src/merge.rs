//! Pure `(existing, canonical) -> merged` functions.
//!
//! Each function owns one document and documents which of its fields are
//! overwritten and which are preserved.

use crate::canonical::{self, CanonicalVersions};
use nxconvert_types::lint::{LintConfig, OneOrMany};
use nxconvert_types::package::PackageManifest;
use nxconvert_types::recommendations::ExtensionRecommendations;
use serde_json::{Map, Value};

/// Merge canonical dependencies and scripts into `existing`.
///
/// - `dependencies` / `devDependencies`: canonical entries are added only
///   when the key is absent. Present values are never touched.
/// - `scripts`: every canonical key is written with its canonical value;
///   other scripts are kept as they were.
/// - Every other field passes through.
pub fn merge_package_manifest(
    existing: &PackageManifest,
    versions: &CanonicalVersions,
) -> PackageManifest {
    let mut merged = existing.clone();

    let scripts = merged.scripts.get_or_insert_with(Map::new);
    for (key, value) in canonical::SCRIPTS {
        scripts.insert(key.to_string(), Value::String(value.to_string()));
    }

    insert_absent(
        merged.dependencies.get_or_insert_with(Map::new),
        versions.dependencies(),
    );
    insert_absent(
        merged.dev_dependencies.get_or_insert_with(Map::new),
        versions.dev_dependencies(),
    );

    merged
}

fn insert_absent(section: &mut Map<String, Value>, entries: Vec<(&'static str, String)>) {
    for (name, version) in entries {
        if !section.contains_key(name) {
            section.insert(name.to_string(), Value::String(version));
        }
    }
}

/// Insert or fully overwrite the module boundary rule and make sure the
/// rules directory that provides it is listed. Other rules are untouched.
pub fn merge_lint_config(existing: &LintConfig) -> LintConfig {
    let mut merged = existing.clone();
    merged.rules.insert(
        canonical::MODULE_BOUNDARIES_RULE.to_string(),
        canonical::module_boundaries_rule(),
    );
    merged.rules_directory = Some(match merged.rules_directory.take() {
        Some(dirs) => dirs.push_unique(canonical::NX_RULES_DIRECTORY),
        None => OneOrMany::Many(vec![canonical::NX_RULES_DIRECTORY.to_string()]),
    });
    merged
}

/// Append every canonical entry not already present, in canonical order.
/// Existing entries keep their order and position.
pub fn merge_recommendation_list(existing: &[String], canonical: &[&str]) -> Vec<String> {
    let mut merged = existing.to_vec();
    for rec in canonical {
        if !merged.iter().any(|r| r == rec) {
            merged.push(rec.to_string());
        }
    }
    merged
}

/// [`merge_recommendation_list`] over the whole `extensions.json` document.
pub fn merge_recommendations(existing: &ExtensionRecommendations) -> ExtensionRecommendations {
    ExtensionRecommendations {
        recommendations: merge_recommendation_list(
            &existing.recommendations,
            canonical::RECOMMENDED_EXTENSIONS,
        ),
        extra: existing.extra.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn recommendations_keep_user_entries_first() {
        let merged = merge_recommendation_list(
            &["eamodio.gitlens".to_string(), "angular.ng-template".to_string()],
            canonical::RECOMMENDED_EXTENSIONS,
        );
        assert_eq!(
            merged,
            vec![
                "eamodio.gitlens",
                "angular.ng-template",
                "nrwl.angular-console",
                "ms-vscode.vscode-typescript-tslint-plugin",
                "esbenp.prettier-vscode",
            ]
        );
    }

    #[test]
    fn recommendations_into_empty_list_is_canonical() {
        let merged = merge_recommendation_list(&[], canonical::RECOMMENDED_EXTENSIONS);
        assert_eq!(merged, canonical::RECOMMENDED_EXTENSIONS);
    }

    #[test]
    fn package_merge_keeps_existing_versions() {
        let pkg: PackageManifest = serde_json::from_value(json!({
            "name": "proj",
            "scripts": { "ng": "ng", "start": "custom start", "postinstall": "ngcc" },
            "dependencies": { "@ngrx/store": "0.0.0" },
            "devDependencies": { "@nrwl/workspace": "0.0.0" }
        }))
        .unwrap();
        let merged = merge_package_manifest(&pkg, &CanonicalVersions::default());

        let deps = merged.dependencies.as_ref().unwrap();
        assert_eq!(deps["@ngrx/store"], "0.0.0");
        assert_eq!(deps["@ngrx/effects"], "8.3.0");
        assert_eq!(deps["@nrwl/angular"], "8.4.13");

        let dev = merged.dev_dependencies.as_ref().unwrap();
        assert_eq!(dev["@nrwl/workspace"], "0.0.0");
        assert_eq!(dev["@angular/cli"], "8.3.14");

        let scripts = merged.scripts.as_ref().unwrap();
        assert_eq!(scripts["start"], "ng serve");
        assert_eq!(scripts["postinstall"], "ngcc");
        assert_eq!(scripts.len(), canonical::SCRIPTS.len() + 1);
    }

    #[test]
    fn package_merge_creates_missing_sections() {
        let pkg: PackageManifest =
            serde_json::from_value(json!({ "name": "proj", "private": true })).unwrap();
        let merged = merge_package_manifest(&pkg, &CanonicalVersions::default());
        let out = serde_json::to_value(&merged).unwrap();
        assert_eq!(out["private"], true);
        assert_eq!(out["devDependencies"]["prettier"], "1.18.2");
        assert_eq!(out["scripts"]["help"], "nx help");
    }

    #[test]
    fn package_merge_keeps_top_level_key_order() {
        let pkg: PackageManifest = serde_json::from_str(
            r#"{ "name": "proj", "scripts": {}, "private": true, "dependencies": {}, "description": "d" }"#,
        )
        .unwrap();
        let merged = merge_package_manifest(&pkg, &CanonicalVersions::default());
        let out = serde_json::to_value(&merged).unwrap();
        let keys: Vec<&str> = out.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec!["name", "scripts", "private", "dependencies", "description", "devDependencies"]
        );
    }

    #[test]
    fn lint_merge_overwrites_only_the_boundary_rule() {
        let cfg: LintConfig = serde_json::from_value(json!({
            "extends": "tslint:recommended",
            "rulesDirectory": ["codelyzer"],
            "rules": {
                "quotemark": [true, "single"],
                "nx-enforce-module-boundaries": false
            }
        }))
        .unwrap();
        let merged = merge_lint_config(&cfg);

        assert_eq!(merged.rules["quotemark"], json!([true, "single"]));
        assert_eq!(
            merged.rules[canonical::MODULE_BOUNDARIES_RULE],
            canonical::module_boundaries_rule()
        );
        assert_eq!(
            merged.rules_directory,
            Some(OneOrMany::Many(vec![
                "codelyzer".to_string(),
                canonical::NX_RULES_DIRECTORY.to_string()
            ]))
        );
        assert_eq!(merged.extra["extends"], "tslint:recommended");

        let again = merge_lint_config(&merged);
        assert_eq!(again, merged);
    }
}
