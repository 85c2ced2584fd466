// ============================================================================
// convoy-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result Alias, Context Helpers and Exit Codes
//
// The CLI reuses convoy-core's error type. Fatal problems (bad selections,
// bad configuration, nothing to convert) end the process with EXIT_FATAL;
// a batch where some files failed ends with EXIT_PARTIAL_FAILURE.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: Adds a human readable prefix to setup errors
// - Exit code constants and the mapping from a BatchResult

// ---- Internal crate imports ----
use convoy_core::{BatchOutcome, BatchResult, CoreError, CoreResult};

// ---- Standard library imports ----
use std::fmt;

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Every file converted (or `formats`/`--help` printed).
pub const EXIT_SUCCESS: i32 = 0;

/// The batch never started: invalid arguments, configuration or inputs.
pub const EXIT_FATAL: i32 = 1;

/// The batch ran but at least one file failed.
pub const EXIT_PARTIAL_FAILURE: i32 = 2;

/// Process exit code for a finished batch.
pub fn exit_code_for(result: &BatchResult) -> i32 {
    match result.outcome() {
        BatchOutcome::Success => EXIT_SUCCESS,
        BatchOutcome::PartialFailure => EXIT_PARTIAL_FAILURE,
    }
}

/// Adds context to errors raised while setting up a run.
pub trait CliErrorContext<T> {
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::Config(format!("{context}: {core_error}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_prefixes_message() {
        let failed: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        let err = failed.cli_context("Creating log directory").unwrap_err();
        let text = err.to_string();
        assert!(text.contains("Creating log directory"));
        assert!(text.contains("denied"));
    }
}
