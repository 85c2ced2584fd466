//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// The `convert` command: discovers inputs, runs one batch and prints the
/// summary.
pub mod convert;

/// The `formats` command: prints the capability table.
pub mod formats;
