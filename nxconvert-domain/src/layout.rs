use crate::paths::{self, PathKind, join, normalize, parent, strip_dir};
use crate::ports::RepoView;
use camino::Utf8Path;
use nxconvert_types::files;
use nxconvert_types::workspace::ProjectConfig;
use serde_json::Value;

/// Root files shared by the whole workspace. They never move with a project.
const SHARED_ROOT_FILES: &[&str] = &[
    files::PACKAGE_JSON,
    files::ANGULAR_JSON,
    files::TSCONFIG_JSON,
    files::TSLINT_JSON,
    files::NX_JSON,
];

/// Project-level root files that move even when no option names them.
const EXTRA_PROJECT_FILES: &[&str] = &["browserslist", ".browserslistrc"];

/// tsconfig files probed inside a project directory that moves as a whole.
const PROJECT_TSCONFIGS: &[&str] = &[
    "tsconfig.json",
    "tsconfig.app.json",
    "tsconfig.spec.json",
    "tsconfig.lib.json",
    "tsconfig.lib.prod.json",
    "tsconfig.e2e.json",
];

const E2E_TSCONFIGS: &[&str] = &["tsconfig.json", "tsconfig.e2e.json"];

/// Where a project lives before and after conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectLayout {
    pub name: String,
    pub old_root: String,
    pub old_source_root: String,
    pub new_root: String,
    pub new_source_root: String,

    /// Root-level files (root `""` projects only) that move into `new_root`.
    pub root_files: Vec<String>,

    /// Relocated tsconfig files as `(old path, new path)`, e2e ones included.
    pub tsconfigs: Vec<(String, String)>,

    pub e2e: Option<E2eLayout>,

    /// The project root lies inside the directory its own `e2e` target runs
    /// from: it is already a standalone e2e project and gets no sibling.
    pub is_e2e_project: bool,
}

/// The e2e tree of a project with a declared `e2e` target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct E2eLayout {
    pub project: String,
    pub old_dir: String,
    pub new_root: String,
}

impl ProjectLayout {
    /// Work out the layout of `project`, probing `repo` for the files that
    /// travel with it. Missing directories are left for the validator.
    pub fn discover(name: &str, project: &ProjectConfig, repo: &dyn RepoView) -> ProjectLayout {
        let old_root = normalize(&project.root);
        let mut old_source_root = normalize(&project.effective_source_root());
        if old_source_root.is_empty() {
            old_source_root = files::DEFAULT_SOURCE_DIR.to_string();
        }

        let new_root = join(files::APPS_DIR, name);
        let source_rel = strip_dir(&old_source_root, &old_root).unwrap_or(&old_source_root);
        let new_source_root = join(&new_root, source_rel);

        let e2e_dir = project.target("e2e").map(|target| {
            match target.option_str("protractorConfig").map(normalize) {
                Some(cfg) if !parent(&cfg).is_empty() => parent(&cfg).to_string(),
                _ => join(&old_root, "e2e"),
            }
        });
        let is_e2e_project = !old_root.is_empty()
            && e2e_dir
                .as_deref()
                .is_some_and(|dir| strip_dir(&old_root, dir).is_some());
        let e2e = e2e_dir.filter(|_| !is_e2e_project).map(|old_dir| {
            let sibling = format!("{}{}", name, files::E2E_SUFFIX);
            E2eLayout {
                new_root: join(files::APPS_DIR, &sibling),
                project: sibling,
                old_dir,
            }
        });

        let mut layout = ProjectLayout {
            name: name.to_string(),
            old_root,
            old_source_root,
            new_root,
            new_source_root,
            root_files: vec![],
            tsconfigs: vec![],
            e2e,
            is_e2e_project,
        };

        if layout.old_root.is_empty() {
            layout.root_files = collect_root_files(project, repo);
        }
        layout.tsconfigs = layout.collect_tsconfigs(repo);
        layout
    }

    /// Filesystem moves, in the order they must run.
    pub fn moves(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if self.old_root.is_empty() {
            out.push((self.old_source_root.clone(), self.new_source_root.clone()));
            for file in &self.root_files {
                out.push((file.clone(), join(&self.new_root, file)));
            }
        } else {
            out.push((self.old_root.clone(), self.new_root.clone()));
        }
        if let Some(e2e) = &self.e2e {
            // A nested e2e dir has already travelled with the project root.
            let from = if self.old_root.is_empty() {
                e2e.old_dir.clone()
            } else {
                match strip_dir(&e2e.old_dir, &self.old_root) {
                    Some(rest) => join(&self.new_root, rest),
                    None => e2e.old_dir.clone(),
                }
            };
            out.push((from, e2e.new_root.clone()));
        }
        out
    }

    /// Paths this layout takes away from their current location.
    pub fn move_sources(&self) -> Vec<String> {
        let mut out = if self.old_root.is_empty() {
            let mut v = vec![self.old_source_root.clone()];
            v.extend(self.root_files.iter().cloned());
            v
        } else {
            vec![self.old_root.clone()]
        };
        if let Some(e2e) = &self.e2e
            && (self.old_root.is_empty() || strip_dir(&e2e.old_dir, &self.old_root).is_none())
        {
            out.push(e2e.old_dir.clone());
        }
        out
    }

    /// New location of `value` if it points into something this project
    /// relocates, `None` otherwise.
    pub fn rewrite_path(&self, value: &str) -> Option<String> {
        let v = normalize(value);
        if v.starts_with('/') || v.starts_with("..") {
            return None;
        }

        if let Some(e2e) = &self.e2e
            && let Some(rest) = strip_dir(&v, &e2e.old_dir)
        {
            return Some(join(&e2e.new_root, rest));
        }

        if !self.old_root.is_empty() {
            return strip_dir(&v, &self.old_root).map(|rest| join(&self.new_root, rest));
        }

        if let Some(rest) = strip_dir(&v, &self.old_source_root) {
            return Some(join(&self.new_source_root, rest));
        }
        if self.root_files.iter().any(|f| *f == v) {
            return Some(join(&self.new_root, &v));
        }
        None
    }

    /// `dist/<anything>` becomes `dist/<new root>`.
    pub fn rewrite_output_path(&self, value: &str) -> Option<String> {
        let v = normalize(value);
        match v.split_once('/') {
            Some(("dist", _)) => Some(join("dist", &self.new_root)),
            _ if v == "dist" => Some(join("dist", &self.new_root)),
            _ => self.rewrite_path(&v),
        }
    }

    fn collect_tsconfigs(&self, repo: &dyn RepoView) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if self.old_root.is_empty() {
            for file in &self.root_files {
                if is_tsconfig(file) {
                    out.push((file.clone(), join(&self.new_root, file)));
                }
            }
        } else {
            for file in PROJECT_TSCONFIGS {
                let old = join(&self.old_root, file);
                if repo.is_file(Utf8Path::new(&old)) {
                    out.push((old, join(&self.new_root, file)));
                }
            }
        }
        if let Some(e2e) = &self.e2e {
            for file in E2E_TSCONFIGS {
                let old = join(&e2e.old_dir, file);
                if out.iter().any(|(o, _)| *o == old) {
                    continue;
                }
                if repo.is_file(Utf8Path::new(&old)) {
                    out.push((old, join(&e2e.new_root, file)));
                }
            }
        }
        out
    }
}

fn is_tsconfig(file: &str) -> bool {
    file.starts_with("tsconfig") && file.ends_with(".json")
}

/// Root-level files named by path options of known targets, plus the
/// browserslist files, that exist and are not shared workspace config.
fn collect_root_files(project: &ProjectConfig, repo: &dyn RepoView) -> Vec<String> {
    let mut candidates: Vec<String> = Vec::new();
    if let Some(targets) = project.target_map() {
        for (target_name, target) in targets {
            let overlays = target.configurations.iter().flat_map(|c| c.values());
            for options in std::iter::once(&target.options).chain(overlays) {
                for (option, value) in options {
                    if paths::path_kind(target_name, option) != Some(PathKind::Source) {
                        continue;
                    }
                    collect_strings(value, &mut candidates);
                }
            }
        }
    }
    candidates.extend(EXTRA_PROJECT_FILES.iter().map(|s| s.to_string()));

    let mut out: Vec<String> = Vec::new();
    for candidate in candidates {
        let file = normalize(&candidate);
        if file.is_empty()
            || file.contains('/')
            || file.contains('*')
            || SHARED_ROOT_FILES.contains(&file.as_str())
            || out.contains(&file)
        {
            continue;
        }
        if repo.is_file(Utf8Path::new(&file)) {
            out.push(file);
        }
    }
    out
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => {
            for field in paths::PATH_OBJECT_FIELDS {
                if let Some(Value::String(s)) = map.get(*field) {
                    out.push(s.clone());
                }
            }
        }
        _ => {}
    }
}
