//! Edit engine for nxconvert plans.
//!
//! Responsibilities:
//! - Attach file preconditions (sha256) to a plan.
//! - Apply moves and writes to disk, in plan order.
//! - Generate a unified diff preview.

mod error;

pub use error::{EditError, EditResult};

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use chrono::Utc;
use diffy::PatchFormatter;
use fs_err as fs;
use nxconvert_types::apply::{ApplyReport, ApplySummary};
use nxconvert_types::plan::{ConversionPlan, FilePrecondition, OpKind};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct ApplyOptions {
    pub dry_run: bool,
}

/// Record the sha256 of every existing file a write was derived from.
pub fn attach_preconditions(repo_root: &Utf8Path, plan: &mut ConversionPlan) -> anyhow::Result<()> {
    let mut files = BTreeSet::new();
    for op in &plan.ops {
        if let OpKind::Write {
            path,
            created,
            origin,
            ..
        } = &op.kind
        {
            match origin {
                Some(origin) => {
                    files.insert(origin.clone());
                }
                None if !created => {
                    files.insert(path.clone());
                }
                None => {}
            }
        }
    }

    let mut pres = Vec::new();
    for path in files {
        let abs = abs_path(repo_root, &path);
        let bytes = fs::read(&abs).with_context(|| format!("read {}", abs))?;
        pres.push(FilePrecondition {
            path,
            sha256: sha256_hex(&bytes),
        });
    }
    plan.preconditions = pres;
    Ok(())
}

fn abs_path(repo_root: &Utf8Path, rel: &Utf8Path) -> Utf8PathBuf {
    if rel.is_absolute() {
        rel.to_path_buf()
    } else {
        repo_root.join(rel)
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Check that the workspace is still in the state the plan was made from:
/// every hashed file unchanged, every file the plan creates still absent,
/// every move source present and every move destination free.
pub fn verify_preconditions(repo_root: &Utf8Path, plan: &ConversionPlan) -> EditResult<()> {
    let mut problems = Vec::new();

    for pre in &plan.preconditions {
        let abs = abs_path(repo_root, &pre.path);
        match fs::read(&abs) {
            Ok(bytes) if sha256_hex(&bytes) == pre.sha256 => {}
            Ok(_) => problems.push(format!("{} changed", pre.path)),
            Err(_) => problems.push(format!("{} is missing", pre.path)),
        }
    }

    for (idx, op) in plan.ops.iter().enumerate() {
        match &op.kind {
            OpKind::Move { from, to } => {
                // A later move may take its source from an earlier one.
                let produced = plan.ops[..idx].iter().any(
                    |o| matches!(&o.kind, OpKind::Move { to: earlier, .. } if from.starts_with(earlier)),
                );
                if !produced && !abs_path(repo_root, from).exists() {
                    problems.push(format!("{} is missing", from));
                }
                if abs_path(repo_root, to).exists() {
                    problems.push(format!("{} already exists", to));
                }
            }
            OpKind::Write {
                path,
                created: true,
                ..
            } => {
                if abs_path(repo_root, path).exists() {
                    problems.push(format!("{} already exists", path));
                }
            }
            OpKind::Write { .. } => {}
        }
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(EditError::PreconditionMismatch {
            message: problems.join(", "),
        })
    }
}

/// Unified diff of every write, with git rename headers for moves.
/// Relocated files are diffed against their original location.
pub fn preview_patch(repo_root: &Utf8Path, plan: &ConversionPlan) -> anyhow::Result<String> {
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    for op in &plan.ops {
        match &op.kind {
            OpKind::Move { from, to } => {
                out.push_str(&format!("diff --git a/{} b/{}\n", from, to));
                out.push_str(&format!("rename from {}\nrename to {}\n", from, to));
            }
            OpKind::Write {
                path,
                contents,
                created,
                origin,
            } => {
                let source = origin.as_ref().unwrap_or(path);
                let old = if *created {
                    String::new()
                } else {
                    let abs = abs_path(repo_root, source);
                    fs::read_to_string(&abs).with_context(|| format!("read {}", abs))?
                };
                if &old == contents {
                    continue;
                }

                out.push_str(&format!("diff --git a/{} b/{}\n", source, path));
                if *created {
                    out.push_str("new file mode 100644\n");
                    out.push_str(&format!("--- /dev/null\n+++ b/{}\n", path));
                } else {
                    out.push_str(&format!("--- a/{}\n+++ b/{}\n", source, path));
                }

                let patch = diffy::create_patch(&old, contents);
                let rendered = formatter.fmt_patch(&patch).to_string();
                // diffy repeats the ---/+++ header; keep only the hunks.
                let hunks = rendered
                    .find("\n@@")
                    .map(|idx| &rendered[idx + 1..])
                    .unwrap_or("");
                out.push_str(hunks);
                if !out.ends_with('\n') {
                    out.push('\n');
                }
            }
        }
    }

    Ok(out)
}

/// Apply a plan. Preconditions are verified first; when they fail nothing
/// is touched. With `opts.dry_run` nothing is written, but the report and
/// patch are still produced.
pub fn apply_plan(
    repo_root: &Utf8Path,
    plan: &ConversionPlan,
    opts: &ApplyOptions,
) -> EditResult<(ApplyReport, String)> {
    verify_preconditions(repo_root, plan)?;
    let patch = preview_patch(repo_root, plan)?;

    let mut report = ApplyReport::new(plan.plan_id.clone());
    report.applied = !opts.dry_run;

    if !opts.dry_run {
        report.summary = execute_plan(repo_root, plan)?;
        info!(
            moved = report.summary.moved,
            written = report.summary.written,
            "plan applied"
        );
    }

    report.ended_at = Some(Utc::now());
    Ok((report, patch))
}

fn execute_plan(repo_root: &Utf8Path, plan: &ConversionPlan) -> anyhow::Result<ApplySummary> {
    let mut summary = ApplySummary::default();

    for op in &plan.ops {
        match &op.kind {
            OpKind::Move { from, to } => {
                let src = abs_path(repo_root, from);
                let dst = abs_path(repo_root, to);
                if let Some(parent) = dst.parent() {
                    fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
                }
                fs::rename(&src, &dst).with_context(|| format!("move {} to {}", from, to))?;
                debug!(%from, %to, stage = %op.stage, "moved");
                summary.moved += 1;
            }
            OpKind::Write { path, contents, .. } => {
                let abs = abs_path(repo_root, path);
                if fs::read_to_string(&abs).ok().as_deref() == Some(contents.as_str()) {
                    summary.unchanged += 1;
                    continue;
                }
                if let Some(parent) = abs.parent() {
                    fs::create_dir_all(parent).with_context(|| format!("create {}", parent))?;
                }
                fs::write(&abs, contents).with_context(|| format!("write {}", abs))?;
                debug!(%path, stage = %op.stage, "wrote");
                summary.written += 1;
            }
        }
    }

    Ok(summary)
}
