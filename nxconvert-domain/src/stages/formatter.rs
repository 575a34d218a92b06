use crate::canonical;
use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use camino::Utf8Path;
use nxconvert_types::files;
use nxconvert_types::plan::StageId;
use tracing::debug;

/// Writes the prettier config files the workspace is missing. Existing ones
/// are never replaced.
pub struct FormatterStage;

impl Stage for FormatterStage {
    fn id(&self) -> StageId {
        StageId::Formatter
    }

    fn plan(
        &self,
        _ctx: &PlanContext,
        repo: &dyn RepoView,
        _ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        for (path, contents) in [
            (files::PRETTIERRC, canonical::PRETTIERRC),
            (files::PRETTIERIGNORE, canonical::PRETTIERIGNORE),
        ] {
            if repo.exists(Utf8Path::new(path)) {
                debug!(%path, "keeping existing formatter config");
                out.info(format!("{} already exists; left unchanged", path));
                continue;
            }
            out.write(path, contents.to_string(), true);
        }
        Ok(out)
    }
}
