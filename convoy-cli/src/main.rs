// ============================================================================
// convoy-cli/src/main.rs
// ============================================================================
//
// CONVOY CLI: Entry Point
//
// Parses the command line, dispatches to the selected command and maps the
// outcome to the process exit code:
//   0  every file converted (or nothing to convert was asked for)
//   1  fatal: bad arguments, bad configuration, no inputs, missing ffmpeg
//   2  the batch ran but some files failed

// ---- Internal crate imports ----
use convoy_cli::commands::convert::suggestion_for;
use convoy_cli::terminal;
use convoy_cli::{
    Cli, Commands, EXIT_FATAL, EXIT_SUCCESS, exit_code_for, run_convert, run_formats,
};

// ---- External crate imports ----
use clap::Parser;

// ---- Standard library imports ----
use std::process;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // clap reports --help/--version through the error path.
            let _ = e.print();
            process::exit(if e.use_stderr() { EXIT_FATAL } else { EXIT_SUCCESS });
        }
    };

    let code = match cli.command {
        Commands::Convert(args) => match run_convert(&args) {
            Ok(result) => exit_code_for(&result),
            Err(e) => {
                log::error!("Fatal: {e}");
                terminal::print_error(&e.to_string(), suggestion_for(&e));
                EXIT_FATAL
            }
        },
        Commands::Formats(args) => {
            run_formats(&args);
            EXIT_SUCCESS
        }
    };

    process::exit(code);
}
