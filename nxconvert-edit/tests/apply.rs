//! Applying plans to a scratch workspace.

use camino::Utf8PathBuf;
use nxconvert_edit::{ApplyOptions, EditError, apply_plan, attach_preconditions, preview_patch};
use nxconvert_types::plan::{ConversionPlan, OpKind, PlanOp, StageId};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn create_temp_repo() -> (TempDir, Utf8PathBuf) {
    let td = tempfile::tempdir().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();

    fs::create_dir_all(root.join("src/app")).unwrap();
    fs::write(root.join("src/main.ts"), "bootstrap();\n").unwrap();
    fs::write(root.join("src/app/app.module.ts"), "export class AppModule {}\n").unwrap();
    fs::write(
        root.join("tsconfig.app.json"),
        "{\n  \"extends\": \"./tsconfig.json\"\n}\n",
    )
    .unwrap();
    fs::write(root.join("package.json"), "{\n  \"name\": \"proj\"\n}\n").unwrap();

    (td, root)
}

fn op(stage: StageId, kind: OpKind) -> PlanOp {
    PlanOp { stage, kind }
}

fn sample_plan() -> ConversionPlan {
    let mut plan = ConversionPlan::new(".", "proj");
    plan.ops = vec![
        op(
            StageId::Relocate,
            OpKind::Move {
                from: "src".into(),
                to: "apps/proj/src".into(),
            },
        ),
        op(
            StageId::Relocate,
            OpKind::Move {
                from: "tsconfig.app.json".into(),
                to: "apps/proj/tsconfig.app.json".into(),
            },
        ),
        op(
            StageId::TsconfigRebase,
            OpKind::Write {
                path: "apps/proj/tsconfig.app.json".into(),
                contents: "{\n  \"extends\": \"../../tsconfig.json\"\n}\n".to_string(),
                created: false,
                origin: Some("tsconfig.app.json".into()),
            },
        ),
        op(
            StageId::PackageManifest,
            OpKind::Write {
                path: "package.json".into(),
                contents: "{\n  \"name\": \"proj\",\n  \"scripts\": {}\n}\n".to_string(),
                created: false,
                origin: None,
            },
        ),
        op(
            StageId::Formatter,
            OpKind::Write {
                path: ".prettierrc".into(),
                contents: "{\n  \"singleQuote\": true\n}\n".to_string(),
                created: true,
                origin: None,
            },
        ),
    ];
    plan.recompute_summary();
    plan
}

#[test]
fn preconditions_cover_replaced_and_relocated_files() {
    let (_td, root) = create_temp_repo();
    let mut plan = sample_plan();
    attach_preconditions(&root, &mut plan).unwrap();

    let paths: Vec<&str> = plan.preconditions.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["package.json", "tsconfig.app.json"]);
    assert!(plan.preconditions.iter().all(|p| p.sha256.len() == 64));
}

#[test]
fn apply_moves_then_writes() {
    let (_td, root) = create_temp_repo();
    let mut plan = sample_plan();
    attach_preconditions(&root, &mut plan).unwrap();

    let (report, patch) = apply_plan(&root, &plan, &ApplyOptions::default()).unwrap();

    assert!(report.applied);
    assert_eq!(report.summary.moved, 2);
    assert_eq!(report.summary.written, 3);
    assert!(root.join("apps/proj/src/main.ts").is_file());
    assert!(root.join("apps/proj/src/app/app.module.ts").is_file());
    assert!(!root.join("src").exists());
    assert_eq!(
        fs::read_to_string(root.join("apps/proj/tsconfig.app.json")).unwrap(),
        "{\n  \"extends\": \"../../tsconfig.json\"\n}\n"
    );
    assert!(root.join(".prettierrc").is_file());

    assert!(patch.contains("rename from src\nrename to apps/proj/src\n"));
    assert!(patch.contains("diff --git a/tsconfig.app.json b/apps/proj/tsconfig.app.json\n"));
    assert!(patch.contains("+  \"extends\": \"../../tsconfig.json\""));
    assert!(patch.contains("--- /dev/null\n+++ b/.prettierrc\n"));
}

#[test]
fn dry_run_leaves_the_workspace_alone() {
    let (_td, root) = create_temp_repo();
    let mut plan = sample_plan();
    attach_preconditions(&root, &mut plan).unwrap();

    let (report, patch) = apply_plan(&root, &plan, &ApplyOptions { dry_run: true }).unwrap();

    assert!(!report.applied);
    assert_eq!(report.summary.moved, 0);
    assert!(root.join("src/main.ts").is_file());
    assert!(!root.join("apps").exists());
    assert!(!root.join(".prettierrc").exists());
    assert_eq!(patch, preview_patch(&root, &plan).unwrap());
}

#[test]
fn changed_file_blocks_apply() {
    let (_td, root) = create_temp_repo();
    let mut plan = sample_plan();
    attach_preconditions(&root, &mut plan).unwrap();

    fs::write(root.join("package.json"), "{}\n").unwrap();

    let err = apply_plan(&root, &plan, &ApplyOptions::default()).unwrap_err();
    assert!(matches!(err, EditError::PreconditionMismatch { .. }));
    assert!(err.to_string().contains("package.json changed"));
    assert!(root.join("src/main.ts").is_file());
    assert!(!root.join("apps").exists());
}

#[test]
fn created_file_that_appeared_blocks_apply() {
    let (_td, root) = create_temp_repo();
    let mut plan = sample_plan();
    attach_preconditions(&root, &mut plan).unwrap();

    fs::write(root.join(".prettierrc"), "{}\n").unwrap();

    let err = apply_plan(&root, &plan, &ApplyOptions::default()).unwrap_err();
    assert!(err.is_precondition_mismatch());
    assert!(err.to_string().contains(".prettierrc already exists"));
}

#[test]
fn nested_move_may_start_inside_an_earlier_destination() {
    let td = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(td.path().to_path_buf()).unwrap();
    fs::create_dir_all(root.join("projects/admin/e2e")).unwrap();
    fs::write(root.join("projects/admin/e2e/protractor.conf.js"), "").unwrap();

    let mut plan = ConversionPlan::new(".", "admin");
    plan.ops = vec![
        op(
            StageId::Relocate,
            OpKind::Move {
                from: "projects/admin".into(),
                to: "apps/admin".into(),
            },
        ),
        op(
            StageId::Relocate,
            OpKind::Move {
                from: "apps/admin/e2e".into(),
                to: "apps/admin-e2e".into(),
            },
        ),
    ];

    apply_plan(&root, &plan, &ApplyOptions::default()).unwrap();
    assert!(root.join("apps/admin-e2e/protractor.conf.js").is_file());
    assert!(!root.join("apps/admin/e2e").exists());
}
