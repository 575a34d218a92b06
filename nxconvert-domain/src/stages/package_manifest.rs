use crate::merge::merge_package_manifest;
use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use anyhow::Context;
use nxconvert_types::files;
use nxconvert_types::plan::StageId;
use nxconvert_types::to_pretty_json;

/// Adds the canonical dependencies and scripts to `package.json`.
pub struct PackageManifestStage;

impl Stage for PackageManifestStage {
    fn id(&self) -> StageId {
        StageId::PackageManifest
    }

    fn plan(
        &self,
        ctx: &PlanContext,
        _repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        let merged = merge_package_manifest(&ws.package, &ctx.versions);
        let contents = to_pretty_json(&merged)
            .with_context(|| format!("serialize {}", files::PACKAGE_JSON))?;
        out.write(files::PACKAGE_JSON, contents, false);
        Ok(out)
    }
}
