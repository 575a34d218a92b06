use crate::canonical::CanonicalVersions;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::registry::default_npm_scope;
use crate::stages::{self, Stage};
use anyhow::Context;
use camino::Utf8PathBuf;
use nxconvert_types::plan::{ConversionPlan, OpKind, PlanOp};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct PlanContext {
    pub repo_root: Utf8PathBuf,

    /// Scope for `nx.json`. Falls back to the default project when unset.
    pub npm_scope: Option<String>,

    pub versions: CanonicalVersions,
}

impl PlanContext {
    pub fn npm_scope_for(&self, ws: &ValidatedWorkspace) -> String {
        self.npm_scope
            .clone()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| default_npm_scope(&ws.manifest))
            .unwrap_or_default()
    }
}

pub struct Planner {
    stages: Vec<Box<dyn Stage>>,
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

impl Planner {
    pub fn new() -> Self {
        Self {
            stages: stages::builtin_stages(),
        }
    }

    pub fn with_stages(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    pub fn plan(
        &self,
        ctx: &PlanContext,
        repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<ConversionPlan> {
        let mut plan = ConversionPlan::new(ctx.repo_root.to_string(), ctx.npm_scope_for(ws));

        for stage in &self.stages {
            let id = stage.id();
            let out = stage
                .plan(ctx, repo, ws)
                .with_context(|| format!("plan stage {}", id))?;
            debug!(stage = %id, ops = out.ops.len(), "stage planned");
            plan.ops
                .extend(out.ops.into_iter().map(|kind| PlanOp { stage: id, kind }));
            plan.diagnostics.extend(out.diagnostics);
        }

        // Stage order, then moves before writes within a stage.
        plan.ops.sort_by_key(|op| (op.stage, matches!(op.kind, OpKind::Write { .. })));

        plan.recompute_summary();
        info!(
            moves = plan.summary.moves,
            writes = plan.summary.writes,
            warnings = plan.summary.warnings,
            "plan ready"
        );
        Ok(plan)
    }
}
