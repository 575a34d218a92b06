use crate::merge::merge_lint_config;
use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use anyhow::Context;
use nxconvert_types::files;
use nxconvert_types::plan::StageId;
use nxconvert_types::to_pretty_json;

/// Injects the module boundary rule into `tslint.json`, creating the file
/// when the workspace has none.
pub struct LintConfigStage;

impl Stage for LintConfigStage {
    fn id(&self) -> StageId {
        StageId::LintConfig
    }

    fn plan(
        &self,
        _ctx: &PlanContext,
        _repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        let existing = ws.lint.clone().unwrap_or_default();
        let merged = merge_lint_config(&existing);
        let contents = to_pretty_json(&merged)
            .with_context(|| format!("serialize {}", files::TSLINT_JSON))?;
        out.write(files::TSLINT_JSON, contents, ws.lint.is_none());
        Ok(out)
    }
}
