use thiserror::Error;

/// A workspace that cannot be converted. Raised before any mutation.
#[derive(Debug, Error)]
pub enum PreconditionError {
    #[error("Cannot find {path}")]
    MissingPackageManifest { path: String },

    /// Also used for a project whose own source root is missing.
    #[error("Path: {path} does not exist")]
    MissingSourceDir { path: String },

    #[error("Cannot find {path}")]
    MissingWorkspaceManifest { path: String },

    #[error("Invalid {path}: {message}")]
    InvalidWorkspaceManifest { path: String, message: String },

    #[error("{path} does not declare any projects")]
    NoProjects { path: String },

    /// The project declares an e2e target but its directory is gone.
    #[error("Path: {path} does not exist")]
    MissingE2eDir { project: String, path: String },

    #[error("Path: {path} already exists")]
    DestinationExists { project: String, path: String },

    #[error("Project name {name} is already taken")]
    ProjectNameTaken { name: String },

    #[error("Path: {path} is relocated by both {first} and {second}")]
    OverlappingSources {
        path: String,
        first: String,
        second: String,
    },

    #[error("{path} already exists; the workspace looks converted")]
    AlreadyConverted { path: String },

    #[error("Invalid {path}: {message}")]
    InvalidJson { path: String, message: String },

    #[error("Cannot read {path}: {message}")]
    Unreadable { path: String, message: String },
}

impl PreconditionError {
    /// Path the error is about.
    pub fn path(&self) -> &str {
        match self {
            PreconditionError::MissingPackageManifest { path }
            | PreconditionError::MissingSourceDir { path }
            | PreconditionError::MissingWorkspaceManifest { path }
            | PreconditionError::InvalidWorkspaceManifest { path, .. }
            | PreconditionError::NoProjects { path }
            | PreconditionError::MissingE2eDir { path, .. }
            | PreconditionError::DestinationExists { path, .. }
            | PreconditionError::OverlappingSources { path, .. }
            | PreconditionError::AlreadyConverted { path }
            | PreconditionError::InvalidJson { path, .. }
            | PreconditionError::Unreadable { path, .. } => path,
            PreconditionError::ProjectNameTaken { name } => name,
        }
    }

    /// The missing source directory is reported on its own, without the
    /// generic "could not be converted" banner.
    pub fn is_missing_source(&self) -> bool {
        matches!(self, PreconditionError::MissingSourceDir { .. })
    }
}
