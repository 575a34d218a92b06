//! Domain logic: turn an Angular CLI workspace into a deterministic
//! conversion plan.
//!
//! This crate owns *what* the conversion changes and why. It never mutates
//! the workspace; applying a plan is the job of `nxconvert-edit`.

pub mod canonical;
mod error;
mod layout;
pub mod merge;
pub mod paths;
mod planner;
mod ports;
mod preconditions;
pub mod registry;
mod stages;
pub mod transform;

pub use canonical::CanonicalVersions;
pub use error::PreconditionError;
pub use layout::{E2eLayout, ProjectLayout};
pub use planner::{PlanContext, Planner};
pub use ports::{FsRepoView, RepoView};
pub use preconditions::{ValidateOptions, ValidatedWorkspace, validate_workspace};
pub use stages::{Stage, StageOutput, builtin_stages};
