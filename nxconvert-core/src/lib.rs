//! Embeddable core library for nxconvert.
//!
//! Provides a clap-free entry point that a host process can link against
//! instead of shelling out to the `nxconvert` binary.
//!
//! # Ports
//!
//! Artifact output goes through [`WritePort`](ports::WritePort). The
//! [`adapters`] module provides a filesystem implementation and an
//! in-memory one for embedding and tests.
//!
//! # Entry points
//!
//! - [`run_convert`](pipeline::run_convert) - validate, plan and apply
//! - [`write_plan_artifacts`](pipeline::write_plan_artifacts) - persist plan, patch and report

pub mod adapters;
pub mod pipeline;
pub mod ports;
pub mod settings;

pub use pipeline::{
    ConvertError, ConvertOutcome, GENERIC_FAILURE_MESSAGE, run_convert, write_plan_artifacts,
};
pub use settings::{ConvertSettings, SUPPORTED_PACKAGE};

// Re-exported so callers don't need nxconvert-domain directly.
pub use nxconvert_domain::{CanonicalVersions, PreconditionError, RepoView};
