// ============================================================================
// convoy-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for convoy-core
//
// This module defines the error type used throughout the convoy-core library.
// Errors split into two groups: precondition failures that stop a batch before
// any job runs (invalid format/codec selection, bad configuration) and job
// failures that the orchestrator records and moves past.
//
// KEY COMPONENTS:
// - CoreError: Enum covering every failure the library can report
// - CoreResult: Type alias for Result<T, CoreError>
// - Helper constructors for command related errors

// ---- External crate imports ----
use thiserror::Error;

// ---- Standard library imports ----
use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors reported by the convoy-core library.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A format/codec/fps/quality selection that cannot produce a valid job.
    /// Raised before a batch starts; no job runs.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Probing the filesystem for a free output name failed.
    #[error("Could not resolve output path for '{}': {source}", path.display())]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The transcoding engine failed on one job.
    #[error("Engine error: {0}")]
    Engine(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Required dependency not found: {0}")]
    DependencyNotFound(String),

    #[error("Failed to start {0}: {1}")]
    CommandStart(String, io::Error),

    #[error("{command} exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Notification error: {0}")]
    NotificationError(String),

    #[error("No convertible files found")]
    NoFilesFound,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Result type for convoy-core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Builds a `CommandStart` error for a process that could not be spawned.
pub(crate) fn command_start_error(command: &str, err: io::Error) -> CoreError {
    CoreError::CommandStart(command.to_string(), err)
}

/// Builds a `CommandFailed` error from an exit status and collected stderr.
pub(crate) fn command_failed_error(
    command: &str,
    status: ExitStatus,
    stderr: impl Into<String>,
) -> CoreError {
    CoreError::CommandFailed {
        command: command.to_string(),
        status,
        stderr: stderr.into(),
    }
}
