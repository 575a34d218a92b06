use crate::canonical;
use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use nxconvert_types::plan::StageId;
use tracing::{debug, warn};

/// Moves each project's sources into `apps/<name>` and its e2e tree into
/// `apps/<name>-e2e`.
pub struct RelocateStage;

impl Stage for RelocateStage {
    fn id(&self) -> StageId {
        StageId::Relocate
    }

    fn plan(
        &self,
        _ctx: &PlanContext,
        _repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        for layout in &ws.layouts {
            for (from, to) in layout.moves() {
                debug!(project = %layout.name, %from, %to, "relocate");
                out.move_path(from, to);
            }
            if layout.e2e.is_none() && !layout.is_e2e_project {
                debug!(project = %layout.name, "no e2e target declared");
            }
        }
        // The warning covers the workspace: only when no project brings e2e.
        if !ws
            .layouts
            .iter()
            .any(|l| l.e2e.is_some() || l.is_e2e_project)
        {
            warn!("{}", canonical::E2E_NOT_DECLARED);
            out.warn(canonical::E2E_NOT_DECLARED);
        }
        Ok(out)
    }
}
