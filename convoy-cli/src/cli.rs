// convoy-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use convoy_core::config::{FFMPEG_PATH_ENV, NTFY_TOPIC_ENV};
use convoy_core::{FpsMode, MediaKind, QualityTier};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Convoy: batch media converter",
    long_about = "Converts batches of video, audio and image files to one target format \
                  using ffmpeg and native image codecs via the convoy-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Converts every input file (or every convertible file of an input directory) to one format
    Convert(ConvertArgs),
    /// Lists the supported target formats and their codecs
    Formats(FormatsArgs),
}

#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Input files or directories (directories are searched one level deep)
    #[arg(required = true, value_name = "INPUT")]
    pub inputs: Vec<PathBuf>,

    /// Target format, also used as the output extension (e.g. mp4, mp3, png)
    #[arg(short = 'f', long, value_name = "FORMAT")]
    pub format: String,

    /// Codec for the target format (defaults to the first codec listed by `convoy formats`)
    #[arg(short = 'c', long, value_name = "CODEC")]
    pub codec: Option<String>,

    /// Output frame rate for video targets: `auto` or a positive integer
    #[arg(long, value_name = "FPS", default_value = "auto", value_parser = parse_fps)]
    pub fps: FpsMode,

    /// Drop the audio track of video targets
    #[arg(long)]
    pub no_audio: bool,

    /// Quality tier for image targets
    #[arg(short = 'q', long, value_name = "TIER", default_value = "high", value_parser = parse_quality)]
    pub quality: QualityTier,

    /// Directory receiving every output (defaults to the directory of each source)
    #[arg(short = 'o', long, value_name = "OUTPUT_DIR")]
    pub output_dir: Option<PathBuf>,

    /// Parent directory for scratch audio files of video jobs
    #[arg(long, value_name = "TEMP_DIR")]
    pub temp_dir: Option<PathBuf>,

    /// Directory for log files (defaults to OUTPUT_DIR/logs, or the system temp directory)
    #[arg(short, long, value_name = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// ntfy topic URL for batch notifications (e.g. https://ntfy.sh/your_topic)
    #[arg(long, value_name = "TOPIC_URL", env = NTFY_TOPIC_ENV)]
    pub ntfy: Option<String>,

    /// ffmpeg binary to use instead of the one on PATH
    #[arg(long, value_name = "PATH", env = FFMPEG_PATH_ENV)]
    pub ffmpeg: Option<PathBuf>,

    /// Print one JSON event per line on stdout instead of progress bars
    #[arg(long)]
    pub json: bool,

    /// Show debug output on the console
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct FormatsArgs {
    /// Only list formats of this kind (video, audio or image)
    #[arg(long, value_name = "KIND", value_parser = parse_kind)]
    pub kind: Option<MediaKind>,
}

// --- Value parsers ---

fn parse_fps(value: &str) -> Result<FpsMode, String> {
    value.parse().map_err(|e: convoy_core::CoreError| e.to_string())
}

fn parse_quality(value: &str) -> Result<QualityTier, String> {
    value.parse().map_err(|e: convoy_core::CoreError| e.to_string())
}

fn parse_kind(value: &str) -> Result<MediaKind, String> {
    value.parse()
}
