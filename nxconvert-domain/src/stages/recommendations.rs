use crate::merge::merge_recommendations;
use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use anyhow::Context;
use nxconvert_types::files;
use nxconvert_types::plan::StageId;
use nxconvert_types::to_pretty_json;

/// Appends the recommended editor extensions to `.vscode/extensions.json`.
pub struct RecommendationsStage;

impl Stage for RecommendationsStage {
    fn id(&self) -> StageId {
        StageId::Recommendations
    }

    fn plan(
        &self,
        _ctx: &PlanContext,
        _repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        let existing = ws.recommendations.clone().unwrap_or_default();
        let merged = merge_recommendations(&existing);
        if ws.recommendations.as_ref() == Some(&merged) {
            out.info(format!("{} already lists every extension", files::VSCODE_EXTENSIONS_JSON));
            return Ok(out);
        }
        let contents = to_pretty_json(&merged)
            .with_context(|| format!("serialize {}", files::VSCODE_EXTENSIONS_JSON))?;
        out.write(
            files::VSCODE_EXTENSIONS_JSON,
            contents,
            ws.recommendations.is_none(),
        );
        Ok(out)
    }
}
