//! Rendering helpers (markdown) for human-readable artifacts.

use nxconvert_types::apply::ApplyReport;
use nxconvert_types::plan::{ConversionPlan, OpKind, Severity};

pub fn render_plan_md(plan: &ConversionPlan) -> String {
    let mut out = String::new();
    out.push_str("# nxconvert plan\n\n");
    out.push_str(&format!("- npm scope: `{}`\n", plan.npm_scope));
    out.push_str(&format!(
        "- Moves: {}\n- Writes: {} ({} new files)\n",
        plan.summary.moves, plan.summary.writes, plan.summary.files_created
    ));
    out.push_str(&format!("- Warnings: {}\n\n", plan.summary.warnings));

    if !plan.diagnostics.is_empty() {
        out.push_str("## Diagnostics\n\n");
        for d in &plan.diagnostics {
            let label = match d.severity {
                Severity::Warning => "warning",
                Severity::Info => "info",
            };
            out.push_str(&format!("- **{}** ({}): {}\n", label, d.stage, d.message));
        }
        out.push('\n');
    }

    out.push_str("## Ops\n\n");
    if plan.ops.is_empty() {
        out.push_str("_No ops planned._\n");
        return out;
    }

    for (i, op) in plan.ops.iter().enumerate() {
        let line = match &op.kind {
            OpKind::Move { from, to } => format!("move `{}` → `{}`", from, to),
            OpKind::Write {
                path,
                created: true,
                ..
            } => format!("create `{}`", path),
            OpKind::Write {
                path,
                origin: Some(origin),
                ..
            } => format!("rewrite `{}` (from `{}`)", path, origin),
            OpKind::Write { path, .. } => format!("rewrite `{}`", path),
        };
        out.push_str(&format!("{}. [{}] {}\n", i + 1, op.stage, line));
    }

    out
}

pub fn render_apply_md(apply: &ApplyReport) -> String {
    let mut out = String::new();
    out.push_str("# nxconvert apply\n\n");
    out.push_str(&format!("- Plan: `{}`\n", apply.plan_id));
    if !apply.applied {
        out.push_str("- Dry run: nothing was written\n");
    }
    out.push_str(&format!(
        "- Moved: {}\n- Written: {}\n- Unchanged: {}\n",
        apply.summary.moved, apply.summary.written, apply.summary.unchanged
    ));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use nxconvert_types::plan::{Diagnostic, PlanOp, StageId};
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_plan_says_so() {
        let plan = ConversionPlan::new(".", "proj");
        let md = render_plan_md(&plan);
        assert!(md.starts_with("# nxconvert plan\n\n- npm scope: `proj`\n"));
        assert!(md.ends_with("_No ops planned._\n"));
    }

    #[test]
    fn ops_and_diagnostics_are_listed() {
        let mut plan = ConversionPlan::new(".", "projscope");
        plan.ops.push(PlanOp {
            stage: StageId::Relocate,
            kind: OpKind::Move {
                from: "src".into(),
                to: "apps/proj/src".into(),
            },
        });
        plan.ops.push(PlanOp {
            stage: StageId::TsconfigRebase,
            kind: OpKind::Write {
                path: "apps/proj/tsconfig.app.json".into(),
                contents: String::new(),
                created: false,
                origin: Some("tsconfig.app.json".into()),
            },
        });
        plan.ops.push(PlanOp {
            stage: StageId::Registry,
            kind: OpKind::Write {
                path: "nx.json".into(),
                contents: String::new(),
                created: true,
                origin: None,
            },
        });
        plan.diagnostics.push(Diagnostic::warning(
            StageId::Relocate,
            "No e2e project was migrated because there was none declared in angular.json",
        ));
        plan.recompute_summary();

        let md = render_plan_md(&plan);
        assert!(md.contains("- Moves: 1\n- Writes: 2 (1 new files)\n- Warnings: 1\n"));
        assert!(md.contains("- **warning** (relocate): No e2e project was migrated"));
        let ops: Vec<&str> = md.lines().filter(|l| l.starts_with(char::is_numeric)).collect();
        assert_eq!(
            ops,
            vec![
                "1. [relocate] move `src` → `apps/proj/src`",
                "2. [tsconfig_rebase] rewrite `apps/proj/tsconfig.app.json` (from `tsconfig.app.json`)",
                "3. [registry] create `nx.json`",
            ]
        );
    }

    #[test]
    fn dry_run_apply_is_flagged() {
        let report = ApplyReport::new("abc");
        let md = render_apply_md(&report);
        assert!(md.contains("- Plan: `abc`\n- Dry run: nothing was written\n"));
    }
}
