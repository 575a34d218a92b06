//! Property-based tests for the merge functions.
//!
//! These tests verify that:
//! - canonical dependencies are added only when absent
//! - canonical scripts always win, other scripts survive verbatim
//! - the recommendation merge is idempotent and order-preserving

use nxconvert_domain::CanonicalVersions;
use nxconvert_domain::canonical::{RECOMMENDED_EXTENSIONS, SCRIPTS};
use nxconvert_domain::merge::{merge_package_manifest, merge_recommendation_list};
use nxconvert_types::package::PackageManifest;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::string::string_regex(r"[a-z][a-z0-9:-]{0,12}").unwrap(),
        prop::sample::select(vec![
            "@nrwl/workspace".to_string(),
            "@ngrx/store".to_string(),
            "@nrwl/angular".to_string(),
            "prettier".to_string(),
            "start".to_string(),
            "lint".to_string(),
            "postinstall".to_string(),
        ]),
    ]
}

fn arb_section() -> impl Strategy<Value = Option<Map<String, Value>>> {
    prop::option::of(
        prop::collection::vec((arb_name(), "[0-9]\\.[0-9]\\.[0-9]"), 0..8).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect()
        }),
    )
}

fn arb_manifest() -> impl Strategy<Value = PackageManifest> {
    (arb_section(), arb_section(), arb_section()).prop_map(|(scripts, deps, dev)| {
        let mut extra = Map::new();
        extra.insert("name".to_string(), Value::String("proj".to_string()));
        extra.insert(
            "description".to_string(),
            Value::String("some description".to_string()),
        );
        let mut pkg = PackageManifest::default();
        pkg.extra = extra;
        pkg.scripts = scripts;
        pkg.dependencies = deps;
        pkg.dev_dependencies = dev;
        pkg
    })
}

fn arb_recommendations() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        prop_oneof![
            prop::string::string_regex(r"[a-z]{1,6}\.[a-z-]{1,10}").unwrap(),
            prop::sample::select(RECOMMENDED_EXTENSIONS.to_vec()).prop_map(str::to_string),
        ],
        0..6,
    )
    .prop_map(|mut v| {
        let mut seen = std::collections::HashSet::new();
        v.retain(|s| seen.insert(s.clone()));
        v
    })
}

proptest! {
    #[test]
    fn present_dependencies_are_never_overwritten(pkg in arb_manifest()) {
        let versions = CanonicalVersions::default();
        let merged = merge_package_manifest(&pkg, &versions);

        let check = |before: &Option<Map<String, Value>>,
                     after: &Option<Map<String, Value>>,
                     canonical: Vec<(&'static str, String)>| {
            let after = after.as_ref().expect("section exists after merge");
            for (name, version) in canonical {
                match before.as_ref().and_then(|m| m.get(name)) {
                    Some(old) => assert_eq!(&after[name], old),
                    None => assert_eq!(after[name], Value::String(version)),
                }
            }
            if let Some(before) = before {
                for (k, v) in before {
                    assert_eq!(&after[k.as_str()], v);
                }
            }
        };
        check(&pkg.dependencies, &merged.dependencies, versions.dependencies());
        check(&pkg.dev_dependencies, &merged.dev_dependencies, versions.dev_dependencies());
        prop_assert_eq!(&merged.extra, &pkg.extra);
    }

    #[test]
    fn canonical_scripts_win_and_others_survive(pkg in arb_manifest()) {
        let merged = merge_package_manifest(&pkg, &CanonicalVersions::default());
        let scripts = merged.scripts.expect("scripts after merge");
        for (key, value) in SCRIPTS {
            prop_assert_eq!(&scripts[*key], &Value::String(value.to_string()));
        }
        if let Some(before) = pkg.scripts {
            for (k, v) in before {
                if !SCRIPTS.iter().any(|(c, _)| *c == k) {
                    prop_assert_eq!(&scripts[k.as_str()], &v);
                }
            }
        }
    }

    #[test]
    fn recommendation_merge_is_idempotent(existing in arb_recommendations()) {
        let once = merge_recommendation_list(&existing, RECOMMENDED_EXTENSIONS);
        let twice = merge_recommendation_list(&once, RECOMMENDED_EXTENSIONS);
        prop_assert_eq!(&once, &twice);

        // existing entries keep their position
        prop_assert_eq!(&once[..existing.len()], &existing[..]);

        // no duplicates, every canonical entry present
        let unique: std::collections::HashSet<_> = once.iter().collect();
        prop_assert_eq!(unique.len(), once.len());
        for rec in RECOMMENDED_EXTENSIONS {
            prop_assert!(once.iter().any(|r| r == rec));
        }
    }

    #[test]
    fn package_merge_is_idempotent(pkg in arb_manifest()) {
        let versions = CanonicalVersions::default();
        let once = merge_package_manifest(&pkg, &versions);
        let twice = merge_package_manifest(&once, &versions);
        prop_assert_eq!(once, twice);
    }
}

#[test]
fn merging_into_a_b_appends_only_missing_canonical_entries() {
    let existing = vec!["a".to_string(), "angular.ng-template".to_string()];
    let merged = merge_recommendation_list(&existing, RECOMMENDED_EXTENSIONS);
    assert_eq!(
        merged,
        vec![
            "a",
            "angular.ng-template",
            "nrwl.angular-console",
            "ms-vscode.vscode-typescript-tslint-plugin",
            "esbenp.prettier-vscode",
        ]
    );
}
