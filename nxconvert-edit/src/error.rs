//! Error types for nxconvert-edit.
//!
//! - Precondition mismatches: the workspace changed between planning and
//!   applying. Nothing was written.
//! - Runtime errors: I/O failures while moving or writing. Earlier
//!   operations of the plan stay applied.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditError {
    #[error("workspace changed since the plan was made: {message}")]
    PreconditionMismatch { message: String },

    #[error("{0:#}")]
    Runtime(#[from] anyhow::Error),
}

impl EditError {
    pub fn is_precondition_mismatch(&self) -> bool {
        matches!(self, EditError::PreconditionMismatch { .. })
    }
}

pub type EditResult<T> = Result<T, EditError>;
