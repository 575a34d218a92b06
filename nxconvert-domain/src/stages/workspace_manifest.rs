use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use crate::transform::transform_workspace;
use anyhow::Context;
use nxconvert_types::files;
use nxconvert_types::plan::StageId;
use nxconvert_types::to_pretty_json;
use tracing::info;

/// Rewrites `angular.json` into the multi-project layout.
pub struct WorkspaceManifestStage;

impl Stage for WorkspaceManifestStage {
    fn id(&self) -> StageId {
        StageId::WorkspaceManifest
    }

    fn plan(
        &self,
        _ctx: &PlanContext,
        _repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        let converted = transform_workspace(&ws.manifest, &ws.layouts);
        info!(projects = converted.projects.len(), "workspace manifest converted");
        let contents = to_pretty_json(&converted)
            .with_context(|| format!("serialize {}", files::ANGULAR_JSON))?;
        out.write(files::ANGULAR_JSON, contents, false);
        Ok(out)
    }
}
