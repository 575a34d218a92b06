//! The conversion pipeline, extracted from the CLI.
//!
//! Validation and planning read the workspace through `RepoView`; only the
//! apply step touches disk, and only after the plan's preconditions hold.

use crate::ports::WritePort;
use crate::settings::{ConvertSettings, SUPPORTED_PACKAGE};
use anyhow::Context;
use camino::Utf8Path;
use nxconvert_domain::{
    FsRepoView, PlanContext, Planner, PreconditionError, ValidateOptions, validate_workspace,
};
use nxconvert_edit::{ApplyOptions, EditError, apply_plan, attach_preconditions};
use nxconvert_render::{render_apply_md, render_plan_md};
use nxconvert_types::apply::ApplyReport;
use nxconvert_types::plan::ConversionPlan;
use tracing::{debug, info};

/// Printed after the cause of a failed conversion.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Your workspace could not be converted into an Nx Workspace because of the above error.";

/// Error type for pipeline results. Exit code 2 = usage error, 1 = everything else.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Unsupported package {package}; only {SUPPORTED_PACKAGE} can be added")]
    UnsupportedPackage { package: String },

    #[error(transparent)]
    Precondition(#[from] PreconditionError),

    #[error("workspace changed since the plan was made: {0}")]
    PreconditionMismatch(String),

    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ConvertError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ConvertError::UnsupportedPackage { .. } => 2,
            _ => 1,
        }
    }

    /// Whether the cause should be followed by [`GENERIC_FAILURE_MESSAGE`].
    pub fn wants_generic_banner(&self) -> bool {
        match self {
            ConvertError::UnsupportedPackage { .. } => false,
            ConvertError::Precondition(err) => !err.is_missing_source(),
            ConvertError::PreconditionMismatch(_) | ConvertError::Internal(_) => true,
        }
    }
}

impl From<EditError> for ConvertError {
    fn from(err: EditError) -> Self {
        match err {
            EditError::PreconditionMismatch { message } => ConvertError::PreconditionMismatch(message),
            EditError::Runtime(err) => ConvertError::Internal(err),
        }
    }
}

/// Outcome of `run_convert`.
#[derive(Debug, Clone)]
pub struct ConvertOutcome {
    pub plan: ConversionPlan,
    pub apply: ApplyReport,
    pub patch: String,
}

/// Validate the workspace, plan every stage, then apply the plan (unless
/// `settings.dry_run`).
///
/// Nothing is mutated when validation or planning fails. An I/O failure
/// while applying leaves earlier moves in place.
pub fn run_convert(settings: &ConvertSettings) -> Result<ConvertOutcome, ConvertError> {
    if settings.package != SUPPORTED_PACKAGE {
        return Err(ConvertError::UnsupportedPackage {
            package: settings.package.clone(),
        });
    }

    let repo = FsRepoView::new(settings.repo_root.clone());
    let ws = validate_workspace(
        &repo,
        &ValidateOptions {
            source_dir: settings.source_dir.clone(),
        },
    )?;
    debug!(projects = ws.layouts.len(), "workspace passed preconditions");

    let ctx = PlanContext {
        repo_root: settings.repo_root.clone(),
        npm_scope: settings.npm_scope.clone(),
        versions: settings.versions.clone(),
    };
    let mut plan = Planner::new()
        .plan(&ctx, &repo, &ws)
        .context("generate plan")?;
    attach_preconditions(&settings.repo_root, &mut plan).context("attach preconditions")?;

    let opts = ApplyOptions {
        dry_run: settings.dry_run,
    };
    let (apply, patch) = apply_plan(&settings.repo_root, &plan, &opts)?;

    if settings.dry_run {
        info!(ops = plan.ops.len(), "dry run; workspace left untouched");
    } else if !settings.skip_install {
        info!("run your package manager's install to fetch the added dependencies");
    }

    Ok(ConvertOutcome { plan, apply, patch })
}

/// Write `plan.json`, `plan.md`, `patch.diff`, `apply.json` and `apply.md`
/// into `out_dir`.
pub fn write_plan_artifacts(
    outcome: &ConvertOutcome,
    out_dir: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    writer.create_dir_all(out_dir)?;

    let plan_json = serde_json::to_string_pretty(&outcome.plan).context("serialize plan")?;
    writer.write_file(&out_dir.join("plan.json"), plan_json.as_bytes())?;

    let plan_md = render_plan_md(&outcome.plan);
    writer.write_file(&out_dir.join("plan.md"), plan_md.as_bytes())?;

    writer.write_file(&out_dir.join("patch.diff"), outcome.patch.as_bytes())?;

    let apply_json = serde_json::to_string_pretty(&outcome.apply).context("serialize apply")?;
    writer.write_file(&out_dir.join("apply.json"), apply_json.as_bytes())?;

    let apply_md = render_apply_md(&outcome.apply);
    writer.write_file(&out_dir.join("apply.md"), apply_md.as_bytes())?;

    Ok(())
}
