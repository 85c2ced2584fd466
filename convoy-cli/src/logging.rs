// ============================================================================
// convoy-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: Console and Run Log Dispatch
//
// Every `convert` run writes a full debug log to
// `<log_dir>/convoy_convert_run_<timestamp>.log`. The console only shows
// warnings and errors unless --verbose is given, so log lines do not fight
// with the progress bars.
//
// KEY COMPONENTS:
// - get_timestamp: Timestamp used in log file names
// - setup_logging: Installs the fern dispatcher as the global logger

// ---- Internal crate imports ----
use crate::error::{CliErrorContext, CliResult};

// ---- External crate imports ----
use convoy_core::CoreError;
use log::LevelFilter;
use owo_colors::OwoColorize;

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// File name of the run log started at `timestamp`.
pub fn log_file_name(timestamp: &str) -> String {
    format!("convoy_convert_run_{timestamp}.log")
}

/// Installs the global logger and returns the path of the run log.
///
/// Can only succeed once per process.
pub fn setup_logging(log_dir: &Path, verbose: bool) -> CliResult<PathBuf> {
    fs::create_dir_all(log_dir)
        .cli_context(format!("Failed to create log directory '{}'", log_dir.display()))?;
    let log_path = log_dir.join(log_file_name(&get_timestamp()));
    let log_file = fern::log_file(&log_path)
        .cli_context(format!("Failed to open log file '{}'", log_path.display()))?;

    let console_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let file_dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .chain(log_file);

    let console_dispatch = fern::Dispatch::new()
        .level(console_level)
        .format(|out, message, record| {
            let level = match record.level() {
                log::Level::Error => "error".red().bold().to_string(),
                log::Level::Warn => "warn".yellow().bold().to_string(),
                log::Level::Info => "info".green().to_string(),
                log::Level::Debug => "debug".blue().to_string(),
                log::Level::Trace => "trace".dimmed().to_string(),
            };
            out.finish(format_args!("{level}: {message}"))
        })
        .chain(std::io::stderr());

    fern::Dispatch::new()
        .level(LevelFilter::Debug)
        // ntfy's HTTP stack is chatty at debug.
        .level_for("reqwest", LevelFilter::Warn)
        .level_for("ureq", LevelFilter::Warn)
        .chain(file_dispatch)
        .chain(console_dispatch)
        .apply()
        .map_err(|e| CoreError::Config(format!("Failed to initialise logging: {e}")))?;

    log::debug!("Logging to {}", log_path.display());
    Ok(log_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_shape() {
        let stamp = get_timestamp();
        assert_eq!(stamp.len(), 15);
        assert_eq!(stamp.as_bytes()[8], b'_');
        assert!(stamp.chars().filter(|c| *c != '_').all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_log_file_name() {
        assert_eq!(log_file_name("20240601_123045"), "convoy_convert_run_20240601_123045.log");
    }
}
