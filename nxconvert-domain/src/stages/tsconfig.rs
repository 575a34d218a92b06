use crate::layout::ProjectLayout;
use crate::paths::{join, normalize, parent, relative};
use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use crate::stages::{Stage, StageOutput};
use anyhow::Context;
use camino::Utf8Path;
use nxconvert_types::plan::StageId;
use nxconvert_types::to_pretty_json;
use serde_json::Value;
use tracing::{debug, warn};

/// Keeps relocated tsconfig files pointing at what they pointed at before.
///
/// Only `extends` and the directory-valued compiler options are rebased.
/// `files` / `include` / `exclude` travel with the file and stay valid.
pub struct TsconfigRebaseStage;

impl TsconfigRebaseStage {
    fn rebase(layout: &ProjectLayout, old: &str, new: &str, doc: &mut Value) -> bool {
        let old_dir = parent(old);
        let new_dir = parent(new);
        let rebase_one = |value: &str| -> Option<String> {
            if value.starts_with('/') {
                return None;
            }
            let resolved = normalize(&join(old_dir, value));
            let target = layout.rewrite_path(&resolved).unwrap_or(resolved);
            let rebased = relative(new_dir, &target);
            (normalize(&rebased) != normalize(value)).then_some(rebased)
        };

        let mut changed = false;
        let Some(obj) = doc.as_object_mut() else {
            return false;
        };

        if let Some(Value::String(ext)) = obj.get_mut("extends")
            && (ext.starts_with("./") || ext.starts_with("../"))
            && let Some(rebased) = rebase_one(ext.as_str())
        {
            *ext = rebased;
            changed = true;
        }

        if let Some(Value::Object(opts)) = obj.get_mut("compilerOptions") {
            for key in ["outDir", "baseUrl", "rootDir"] {
                if let Some(Value::String(dir)) = opts.get_mut(key)
                    && let Some(rebased) = rebase_one(dir.as_str())
                {
                    *dir = rebased;
                    changed = true;
                }
            }
            if let Some(Value::Array(roots)) = opts.get_mut("typeRoots") {
                for root in roots.iter_mut() {
                    if let Value::String(dir) = root
                        && let Some(rebased) = rebase_one(dir.as_str())
                    {
                        *dir = rebased;
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}

impl Stage for TsconfigRebaseStage {
    fn id(&self) -> StageId {
        StageId::TsconfigRebase
    }

    fn plan(
        &self,
        _ctx: &PlanContext,
        repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput> {
        let mut out = StageOutput::new(self.id());
        for layout in &ws.layouts {
            for (old, new) in &layout.tsconfigs {
                let contents = repo.read_to_string(Utf8Path::new(old))?;
                let mut doc: Value = match serde_json::from_str(&contents) {
                    Ok(doc) => doc,
                    Err(err) => {
                        warn!(path = %old, "not rebasing tsconfig: {}", err);
                        out.warn(format!("{} was moved without rebasing: {}", old, err));
                        continue;
                    }
                };
                if !Self::rebase(layout, old, new, &mut doc) {
                    continue;
                }
                debug!(from = %old, to = %new, "rebased tsconfig");
                let rendered =
                    to_pretty_json(&doc).with_context(|| format!("serialize {}", new))?;
                out.write_relocated(old.as_str(), new.as_str(), rendered);
            }
        }
        Ok(out)
    }
}
