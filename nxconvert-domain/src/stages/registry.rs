use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::registry::build_registry;
use crate::stages::{Stage, StageOutput};
use anyhow::Context;
use nxconvert_types::files;
use nxconvert_types::plan::StageId;
use nxconvert_types::to_pretty_json;
use tracing::info;

/// Creates `nx.json`.
pub struct RegistryStage;

impl Stage for RegistryStage {
    fn id(&self) -> StageId {
        StageId::Registry
    }

    fn plan(
        &self,
        ctx: &PlanContext,
        _repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        let scope = ctx.npm_scope_for(ws);
        info!(npm_scope = %scope, "registry");
        let registry = build_registry(&scope, ws.converted_project_names());
        let contents =
            to_pretty_json(&registry).with_context(|| format!("serialize {}", files::NX_JSON))?;
        out.write(files::NX_JSON, contents, true);
        Ok(out)
    }
}
