//! Implementation of the 'convert' subcommand.
//!
//! Validates the selections, expands the inputs, wires the configured event
//! handlers (progress bars or JSON, ntfy) into a `BatchOrchestrator` and
//! runs the batch.

use crate::cli::ConvertArgs;
use crate::error::CliResult;
use crate::logging;
use crate::progress::TerminalProgress;
use crate::terminal;

use convoy_core::events::JsonEventHandler;
use convoy_core::notifications::{NotificationEventHandler, NtfyNotificationSender};
use convoy_core::{
    BatchOrchestrator, BatchResult, CapabilityRegistry, ConversionRequest, CoreConfig,
    CoreConfigBuilder, CoreError, MediaEngine, MediaKind, check_dependency, find_convertible_files,
};

use std::path::PathBuf;
use std::sync::Arc;

use log::{debug, info, warn};

/// Runs one batch for `args` and returns its result.
///
/// Errors are fatal: nothing was converted.
pub fn run_convert(args: &ConvertArgs) -> CliResult<BatchResult> {
    let registry = CapabilityRegistry::global();
    let request = build_request(args);
    // Reject bad selections before anything touches the disk.
    let template = request.validate(registry)?;

    let log_dir = default_log_dir(args);
    let log_path = logging::setup_logging(&log_dir, args.verbose)?;

    let config = build_config(args);
    config.validate()?;
    debug!("Run configuration: {config:?}");

    let sources = discover_convert_files(&args.inputs, template.media_kind())?;

    if template.media_kind() != MediaKind::Image {
        check_dependency(&config.ffmpeg_command())?;
    }

    if !args.json {
        terminal::print_section("Convoy");
        terminal::print_status("Format", template.target_format());
        terminal::print_status("Codec", template.codec());
        terminal::print_status("Kind", template.media_kind().as_str());
        if let Some(dir) = &config.output_dir {
            terminal::print_status("Output", &dir.display().to_string());
        }
        terminal::print_status("Log", &log_path.display().to_string());
        terminal::print_section(&format!("Inputs ({})", sources.len()));
        terminal::print_file_list(&sources);
        println!();
    }

    let mut orchestrator =
        BatchOrchestrator::new(MediaEngine::from_config(&config), registry).with_config(&config);
    if args.json {
        orchestrator.add_handler(Arc::new(JsonEventHandler::new()));
    } else {
        orchestrator.add_handler(Arc::new(TerminalProgress::new()));
    }
    if let Some(topic) = &config.ntfy_topic {
        let sender = NtfyNotificationSender::new(topic)?;
        info!("Sending notifications to {}", sender.topic_url());
        orchestrator.add_handler(Arc::new(NotificationEventHandler::new(Arc::new(sender))));
    }

    let result = orchestrator.run(&sources, &request)?;

    if !args.json {
        terminal::print_batch_summary(&result);
    }
    Ok(result)
}

/// The conversion selections carried by `args`.
pub fn build_request(args: &ConvertArgs) -> ConversionRequest {
    let mut request = ConversionRequest::new(args.format.as_str())
        .fps(args.fps)
        .audio(!args.no_audio)
        .quality(args.quality);
    if let Some(codec) = &args.codec {
        request = request.codec(codec.as_str());
    }
    request
}

fn build_config(args: &ConvertArgs) -> CoreConfig {
    let mut builder = CoreConfigBuilder::new();
    if let Some(dir) = &args.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(dir) = &args.temp_dir {
        builder = builder.temp_dir(dir.clone());
    }
    if let Some(topic) = &args.ntfy {
        builder = builder.ntfy_topic(topic.clone());
    }
    if let Some(ffmpeg) = &args.ffmpeg {
        builder = builder.ffmpeg_path(ffmpeg.clone());
    }
    builder.build()
}

fn default_log_dir(args: &ConvertArgs) -> PathBuf {
    match (&args.log_dir, &args.output_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(output)) => output.join("logs"),
        (None, None) => std::env::temp_dir().join("convoy-logs"),
    }
}

/// Expands the command line inputs into the batch's source list.
///
/// Directories contribute their convertible files for `kind` (top level,
/// sorted); a directory with none is skipped with a warning. Anything else
/// is taken as given, so a missing file shows up as a failed job rather than
/// silently disappearing. Fails with `NoFilesFound` when nothing is left.
pub fn discover_convert_files(inputs: &[PathBuf], kind: MediaKind) -> CliResult<Vec<PathBuf>> {
    let mut sources = Vec::new();
    for input in inputs {
        if input.is_dir() {
            match find_convertible_files(input, kind) {
                Ok(files) => sources.extend(files),
                Err(CoreError::NoFilesFound) => {
                    warn!("No {} sources found in {}", kind, input.display());
                }
                Err(e) => return Err(e),
            }
        } else {
            if !input.exists() {
                warn!("Input {} does not exist", input.display());
            }
            sources.push(input.clone());
        }
    }

    if sources.is_empty() {
        return Err(CoreError::NoFilesFound);
    }
    debug!("{} source(s) from {} input(s)", sources.len(), inputs.len());
    Ok(sources)
}

/// A one-line hint for fatal errors a user can fix.
pub fn suggestion_for(error: &CoreError) -> Option<&'static str> {
    match error {
        CoreError::InvalidParameter(_) => Some("run `convoy formats` to list formats and codecs"),
        CoreError::DependencyNotFound(_) => Some("install ffmpeg or point --ffmpeg at it"),
        CoreError::NoFilesFound => Some("pass files, or directories holding files of the target's kind"),
        _ => None,
    }
}
