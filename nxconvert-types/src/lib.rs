//! Shared DTOs for the nxconvert workspace.
//!
//! Two families of types live here:
//! - the on-disk documents the converter reads and writes (`angular.json`,
//!   `package.json`, `nx.json`, `tslint.json`, `.vscode/extensions.json`);
//! - the conversion plan and apply report, which are artifacts of a run.
//!
//! Every document type keeps unknown keys in a flattened map so that a
//! read-modify-write cycle never drops user data.

pub mod apply;
pub mod files;
pub mod lint;
pub mod package;
pub mod plan;
pub mod recommendations;
pub mod registry;
pub mod workspace;

/// Schema identifiers.
pub mod schema {
    pub const NXCONVERT_PLAN_V1: &str = "nxconvert.plan.v1";
    pub const NXCONVERT_APPLY_V1: &str = "nxconvert.apply.v1";
}

/// Serialize a document the way every converted file is written:
/// two-space indentation and a trailing newline.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}
