//! Path helpers and the declarative rewrite table.
//!
//! Manifest paths are workspace-relative strings with `/` separators. All
//! helpers here are lexical; none of them touch the filesystem.

/// How a path-valued option is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    /// A path under the project's old root; moves with the project.
    Source,
    /// A build output directory; `dist/<x>` becomes `dist/<new root>`.
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOption {
    pub name: &'static str,
    pub kind: PathKind,
}

const fn source(name: &'static str) -> PathOption {
    PathOption {
        name,
        kind: PathKind::Source,
    }
}

const fn output(name: &'static str) -> PathOption {
    PathOption {
        name,
        kind: PathKind::Output,
    }
}

/// Target names the transformer recognizes.
pub const KNOWN_TARGETS: &[&str] = &["build", "serve", "test", "lint", "e2e"];

const BUILD: &[PathOption] = &[
    output("outputPath"),
    source("index"),
    source("main"),
    source("polyfills"),
    source("tsConfig"),
    source("assets"),
    source("styles"),
    source("scripts"),
    source("fileReplacements"),
];

const TEST: &[PathOption] = &[
    source("main"),
    source("polyfills"),
    source("tsConfig"),
    source("karmaConfig"),
    source("assets"),
    source("styles"),
    source("scripts"),
    source("fileReplacements"),
];

const LINT: &[PathOption] = &[source("tsConfig")];

const E2E: &[PathOption] = &[source("protractorConfig"), source("tsConfig")];

/// Option names expected to hold paths, per target type.
///
/// Options outside the table are still rewritten when their value sits
/// under a relocated prefix; the table adds output-path handling and
/// decides which root-level files travel with the project.
pub fn path_options(target: &str) -> &'static [PathOption] {
    match target {
        "build" => BUILD,
        "test" => TEST,
        "lint" => LINT,
        "e2e" => E2E,
        _ => &[],
    }
}

pub fn path_kind(target: &str, option: &str) -> Option<PathKind> {
    path_options(target)
        .iter()
        .find(|o| o.name == option)
        .map(|o| o.kind)
}

/// Fields of object-valued entries (`fileReplacements`, asset objects)
/// that hold paths.
pub const PATH_OBJECT_FIELDS: &[&str] = &["input", "replace", "with"];

/// Lexically normalize: drop `.` segments and empty segments, fold `..`.
pub fn normalize(path: &str) -> String {
    let absolute = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();
    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if absolute => {}
                _ => parts.push(".."),
            },
            s => parts.push(s),
        }
    }
    let joined = parts.join("/");
    if absolute {
        format!("/{}", joined)
    } else {
        joined
    }
}

/// `dir/rest` with empty components elided.
pub fn join(dir: &str, rest: &str) -> String {
    match (dir.is_empty(), rest.is_empty()) {
        (true, _) => rest.to_string(),
        (_, true) => dir.to_string(),
        _ => format!("{}/{}", dir.trim_end_matches('/'), rest),
    }
}

/// If `path` is `dir` or lies under it, the remainder (possibly empty).
pub fn strip_dir<'a>(path: &'a str, dir: &str) -> Option<&'a str> {
    if dir.is_empty() {
        return Some(path);
    }
    if path == dir {
        return Some("");
    }
    path.strip_prefix(dir)?.strip_prefix('/')
}

/// Directory part of a normalized path (`""` at the workspace root).
pub fn parent(path: &str) -> &str {
    path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
}

/// Relative path from directory `from` to `to`, both workspace-relative
/// and normalized. Always starts with `./` or `../`.
pub fn relative(from: &str, to: &str) -> String {
    let from_parts: Vec<&str> = from.split('/').filter(|s| !s.is_empty()).collect();
    let to_parts: Vec<&str> = to.split('/').filter(|s| !s.is_empty()).collect();

    let common = from_parts
        .iter()
        .zip(to_parts.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segs: Vec<&str> = std::iter::repeat_n("..", from_parts.len() - common).collect();
    segs.extend(&to_parts[common..]);

    if segs.is_empty() {
        ".".to_string()
    } else if segs[0] == ".." {
        segs.join("/")
    } else {
        format!("./{}", segs.join("/"))
    }
}

/// A relative reference in a config file (`./x`, `../x`, `x/y`), as
/// opposed to a package specifier or an absolute path.
pub fn is_relative_reference(value: &str) -> bool {
    value.starts_with("./") || value.starts_with("../")
}
