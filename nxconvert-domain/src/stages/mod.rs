use crate::planner::PlanContext;
use crate::ports::RepoView;
use crate::preconditions::ValidatedWorkspace;
use camino::Utf8PathBuf;
use nxconvert_types::plan::{Diagnostic, OpKind, StageId};

mod formatter;
mod lint;
mod package_manifest;
mod recommendations;
mod registry;
mod relocate;
mod tsconfig;
mod workspace_manifest;

/// One step of the conversion. Stages only read; they describe what they
/// would change in a [`StageOutput`].
pub trait Stage {
    fn id(&self) -> StageId;

    fn plan(
        &self,
        ctx: &PlanContext,
        repo: &dyn RepoView,
        ws: &ValidatedWorkspace,
    ) -> anyhow::Result<StageOutput>;
}

/// Stages in the order their operations must be applied.
pub fn builtin_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(relocate::RelocateStage),
        Box::new(tsconfig::TsconfigRebaseStage),
        Box::new(workspace_manifest::WorkspaceManifestStage),
        Box::new(package_manifest::PackageManifestStage),
        Box::new(registry::RegistryStage),
        Box::new(lint::LintConfigStage),
        Box::new(recommendations::RecommendationsStage),
        Box::new(formatter::FormatterStage),
    ]
}

#[derive(Debug, Clone)]
pub struct StageOutput {
    stage: StageId,
    pub ops: Vec<OpKind>,
    pub diagnostics: Vec<Diagnostic>,
}

impl StageOutput {
    pub fn new(stage: StageId) -> Self {
        Self {
            stage,
            ops: vec![],
            diagnostics: vec![],
        }
    }

    pub fn move_path(&mut self, from: impl Into<Utf8PathBuf>, to: impl Into<Utf8PathBuf>) {
        self.ops.push(OpKind::Move {
            from: from.into(),
            to: to.into(),
        });
    }

    /// Replace an existing file (`created == false`) or create a new one.
    pub fn write(&mut self, path: impl Into<Utf8PathBuf>, contents: String, created: bool) {
        self.ops.push(OpKind::Write {
            path: path.into(),
            contents,
            created,
            origin: None,
        });
    }

    /// Rewrite a file that an earlier stage relocated from `origin`.
    pub fn write_relocated(
        &mut self,
        origin: impl Into<Utf8PathBuf>,
        path: impl Into<Utf8PathBuf>,
        contents: String,
    ) {
        self.ops.push(OpKind::Write {
            path: path.into(),
            contents,
            created: false,
            origin: Some(origin.into()),
        });
    }

    pub fn warn(&mut self, message: impl Into<String>) {
        self.diagnostics
            .push(Diagnostic::warning(self.stage, message));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::info(self.stage, message));
    }
}
