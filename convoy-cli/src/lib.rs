// convoy-cli/src/lib.rs
//
// Library portion of the Convoy CLI application.
// Contains argument definitions, terminal rendering and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod progress;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, FormatsArgs};
pub use commands::convert::run_convert;
pub use commands::formats::run_formats;
pub use error::{CliResult, EXIT_FATAL, EXIT_PARTIAL_FAILURE, EXIT_SUCCESS, exit_code_for};
