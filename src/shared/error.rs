use crate::dependency_flow::domain::CoherencyError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI pipelines use these to tell a broken coherency chain apart from
/// a usage mistake or an infrastructure failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// One or more coherent-parent chains could not be resolved
    CoherencyFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (missing manifest, unreadable snapshot, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Picks the exit code matching an error raised by a use case.
    pub fn for_error(error: &anyhow::Error) -> Self {
        match error.downcast_ref::<FlowError>() {
            Some(FlowError::CoherencyUpdateFailed { .. }) => ExitCode::CoherencyFailed,
            _ => ExitCode::ApplicationError,
        }
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::CoherencyFailed => write!(f, "Coherency Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

fn dependency_names(errors: &[CoherencyError]) -> String {
    errors
        .iter()
        .map(|e| e.dependency.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Application-specific errors for dependency flow analysis.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("A remote dependency graph was requested but no manifest source is configured\n\n💡 Hint: Pass --snapshot <file> or --manifests-dir <dir>")]
    MissingManifestSource,

    #[error("Root dependencies were not supplied.\n\n💡 Hint: Provide at least one root dependency or build from a repository and commit")]
    EmptyRootDependencies,

    #[error("Dependency {dependency} has non-existent parent dependency {parent}\n\n💡 Hint: Fix the coherent parent name or add '{parent}' to the manifest")]
    NonExistentParent { dependency: String, parent: String },

    #[error("Coherency update failed for the following dependencies: {}", dependency_names(.errors))]
    CoherencyUpdateFailed { errors: Vec<CoherencyError> },

    #[error("No manifest found for {repository} @ {commit}\n\n💡 Hint: Check the repository URI and commit, or add the manifest to the snapshot")]
    ManifestNotFound { repository: String, commit: String },

    #[error("Failed to load snapshot: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the snapshot is valid JSON in the expected layout")]
    SnapshotLoad { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    /// Validation error for requests and builders
    #[error("Validation error: {message}")]
    Validation { message: String },
}
