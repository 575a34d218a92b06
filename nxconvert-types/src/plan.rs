use camino::Utf8PathBuf;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Everything a conversion will do to the workspace, computed before the
/// first mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionPlan {
    pub schema: String,
    pub plan_id: String,
    pub created_at: DateTime<Utc>,
    pub repo_root: String,
    pub npm_scope: String,

    #[serde(default)]
    pub preconditions: Vec<FilePrecondition>,

    /// Applied in order; moves of a stage always precede its writes.
    #[serde(default)]
    pub ops: Vec<PlanOp>,

    #[serde(default)]
    pub diagnostics: Vec<Diagnostic>,

    pub summary: PlanSummary,
}

impl ConversionPlan {
    pub fn new(repo_root: impl Into<String>, npm_scope: impl Into<String>) -> Self {
        Self {
            schema: crate::schema::NXCONVERT_PLAN_V1.to_string(),
            plan_id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            repo_root: repo_root.into(),
            npm_scope: npm_scope.into(),
            preconditions: vec![],
            ops: vec![],
            diagnostics: vec![],
            summary: PlanSummary::default(),
        }
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
    }

    pub fn recompute_summary(&mut self) {
        let mut summary = PlanSummary::default();
        for op in &self.ops {
            match &op.kind {
                OpKind::Move { .. } => summary.moves += 1,
                OpKind::Write { created, .. } => {
                    summary.writes += 1;
                    if *created {
                        summary.files_created += 1;
                    }
                }
            }
        }
        summary.warnings = self.warnings().count() as u64;
        self.summary = summary;
    }
}

/// Content hash of a file read while planning. Apply refuses to run if
/// the file changed in between.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePrecondition {
    pub path: Utf8PathBuf,
    pub sha256: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub moves: u64,
    pub writes: u64,
    pub files_created: u64,
    pub warnings: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanOp {
    pub stage: StageId,
    pub kind: OpKind,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OpKind {
    /// Rename a file or directory. Parent directories of `to` are created.
    Move { from: Utf8PathBuf, to: Utf8PathBuf },

    /// Replace (or create) a file.
    Write {
        path: Utf8PathBuf,
        contents: String,

        /// The file did not exist before the conversion.
        #[serde(default)]
        created: bool,

        /// File the new contents were derived from, when it differs from
        /// `path` (a relocated file rewritten at its new location).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        origin: Option<Utf8PathBuf>,
    },
}

impl OpKind {
    /// Path the op leaves behind on disk.
    pub fn target(&self) -> &Utf8PathBuf {
        match self {
            OpKind::Move { to, .. } => to,
            OpKind::Write { path, .. } => path,
        }
    }
}

/// Pipeline stages, in apply order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageId {
    Relocate,
    TsconfigRebase,
    WorkspaceManifest,
    PackageManifest,
    Registry,
    LintConfig,
    Recommendations,
    Formatter,
}

impl StageId {
    pub fn as_str(self) -> &'static str {
        match self {
            StageId::Relocate => "relocate",
            StageId::TsconfigRebase => "tsconfig_rebase",
            StageId::WorkspaceManifest => "workspace_manifest",
            StageId::PackageManifest => "package_manifest",
            StageId::Registry => "registry",
            StageId::LintConfig => "lint_config",
            StageId::Recommendations => "recommendations",
            StageId::Formatter => "formatter",
        }
    }
}

impl std::fmt::Display for StageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// Non-fatal finding reported while planning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub stage: StageId,
    pub message: String,
}

impl Diagnostic {
    pub fn warning(stage: StageId, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            stage,
            message: message.into(),
        }
    }

    pub fn info(stage: StageId, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Info,
            stage,
            message: message.into(),
        }
    }
}
