// ============================================================================
// convoy-core/src/engine/ffmpeg.rs
// ============================================================================
//
// FFMPEG ENGINE: Video and Audio Conversion Through ffmpeg
//
// Video and audio jobs are transcoded by ffmpeg. A video job that keeps its
// audio runs in two phases, each a separate ffmpeg invocation:
//
//   1. Audio: the first audio track is encoded into a scratch file inside a
//      temporary directory.
//   2. Video: the first video track is encoded and muxed with the scratch
//      audio into the final output.
//
// A muted video job runs only the video phase; an audio job runs only the
// audio phase, writing straight to the output. Progress is reported in
// milliseconds of media time against the duration ffmpeg parses from the
// input. The final output is always written with `-n`, so an existing file is
// never replaced.
//
// KEY COMPONENTS:
// - Argument builders: Pure functions producing each phase's ffmpeg arguments
// - PhaseTracker: Folds ffmpeg events into PhaseEvents and error text
// - FfmpegEngine: TranscodeEngine over an FfmpegSpawner

// ---- Internal crate imports ----
use crate::engine::TranscodeEngine;
use crate::engine::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarSpawner};
use crate::error::{CoreError, CoreResult};
use crate::job::ConversionJob;
use crate::progress::{Phase, PhaseEvent};
use crate::registry::MediaKind;
use crate::utils::parse_ffmpeg_time;

// ---- External crate imports ----
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::{FfmpegEvent, LogLevel};
use tempfile::TempDir;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};

/// Container used for the scratch audio track; holds any audio codec.
const SCRATCH_AUDIO_FILE: &str = "audio.mka";

/// Error lines kept from ffmpeg's output for the failure message.
const MAX_ERROR_LINES: usize = 8;

// ============================================================================
// ARGUMENT BUILDERS
// ============================================================================

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

/// Arguments of an audio job: the first audio track of the source, encoded
/// straight into `output`.
pub fn audio_job_args(job: &ConversionJob, output: &Path) -> Vec<String> {
    let mut args = vec![
        "-i".to_string(),
        path_arg(job.source_path()),
        "-vn".to_string(),
        "-map".to_string(),
        "0:a:0".to_string(),
        "-c:a".to_string(),
        job.codec().to_string(),
    ];
    if let Some(rate) = job.sample_rate() {
        args.extend(["-ar".to_string(), rate.to_string()]);
    }
    args.extend(["-n".to_string(), path_arg(output)]);
    args
}

/// Arguments of the audio sub-encode of a video job, writing into the
/// scratch file. The scratch file lives in a fresh temp dir, so `-y` is safe.
pub fn audio_track_args(job: &ConversionJob, audio_codec: &str, scratch: &Path) -> Vec<String> {
    vec![
        "-i".to_string(),
        path_arg(job.source_path()),
        "-vn".to_string(),
        "-map".to_string(),
        "0:a:0".to_string(),
        "-c:a".to_string(),
        audio_codec.to_string(),
        "-y".to_string(),
        path_arg(scratch),
    ]
}

/// Arguments of the video phase. With `audio_track` the scratch audio is
/// muxed in unchanged; without it the output carries no audio.
pub fn video_args(job: &ConversionJob, audio_track: Option<&Path>, output: &Path) -> Vec<String> {
    let mut args = vec!["-i".to_string(), path_arg(job.source_path())];
    if let Some(track) = audio_track {
        args.extend(["-i".to_string(), path_arg(track)]);
    }

    args.extend(["-map".to_string(), "0:v:0".to_string()]);
    match audio_track {
        Some(_) => args.extend([
            "-map".to_string(),
            "1:a:0".to_string(),
            "-c:a".to_string(),
            "copy".to_string(),
        ]),
        None => args.push("-an".to_string()),
    }

    args.extend(["-c:v".to_string(), job.codec().to_string()]);
    if let Some(fps) = job.fps() {
        args.extend(["-r".to_string(), fps.to_string()]);
    }
    args.extend(["-n".to_string(), path_arg(output)]);
    args
}

// ============================================================================
// EVENT TRACKING
// ============================================================================

/// Turns ffmpeg progress into [`PhaseEvent`]s for one phase and keeps the
/// error lines needed to explain a failure.
#[derive(Debug)]
pub struct PhaseTracker {
    phase: Phase,
    total_ms: u64,
    last_ms: u64,
    errors: Vec<String>,
}

impl PhaseTracker {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            total_ms: 0,
            last_ms: 0,
            errors: Vec::new(),
        }
    }

    /// Duration of the primary input. Later inputs (the scratch audio of
    /// the video phase) are ignored.
    pub fn on_duration(&mut self, seconds: f64) {
        if self.total_ms == 0 && seconds.is_finite() && seconds > 0.0 {
            self.total_ms = (seconds * 1000.0).round() as u64;
        }
    }

    /// Media time reached, as printed by ffmpeg (`HH:MM:SS.ss`).
    pub fn on_time(&mut self, time: &str) -> Option<PhaseEvent> {
        let seconds = parse_ffmpeg_time(time)?;
        let ms = (seconds * 1000.0).round() as u64;
        let ms = if self.total_ms > 0 { ms.min(self.total_ms) } else { ms };
        if ms < self.last_ms {
            return None;
        }
        self.last_ms = ms;
        Some(PhaseEvent::new(self.phase, ms, self.total_ms))
    }

    pub fn on_error_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if self.errors.len() == MAX_ERROR_LINES {
            self.errors.remove(0);
        }
        self.errors.push(line.to_string());
    }

    /// The completion event sent once ffmpeg exits cleanly.
    pub fn finished(&self) -> PhaseEvent {
        let total = self.total_ms.max(1);
        PhaseEvent::new(self.phase, total, total)
    }

    pub fn error_text(&self) -> String {
        self.errors.join("; ")
    }

    fn mentions_missing_stream(&self) -> bool {
        self.errors.iter().any(|line| {
            line.contains("matches no streams") || line.contains("does not contain any stream")
        })
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Outcome of one ffmpeg invocation.
enum PhaseOutcome {
    Done,
    Failed(PhaseTracker, String),
}

/// Transcodes video and audio jobs with ffmpeg.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEngine<S: FfmpegSpawner = SidecarSpawner> {
    spawner: S,
    ffmpeg_path: Option<PathBuf>,
    temp_dir: Option<PathBuf>,
}

impl FfmpegEngine<SidecarSpawner> {
    pub fn new() -> Self {
        Self::with_spawner(SidecarSpawner)
    }
}

impl<S: FfmpegSpawner> FfmpegEngine<S> {
    pub fn with_spawner(spawner: S) -> Self {
        Self {
            spawner,
            ffmpeg_path: None,
            temp_dir: None,
        }
    }

    /// Runs this ffmpeg binary instead of the one on `PATH`.
    pub fn ffmpeg_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ffmpeg_path = Some(path.into());
        self
    }

    /// Parent directory for the scratch audio; defaults to the output's directory.
    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    fn command(&self, args: &[String]) -> FfmpegCommand {
        let mut cmd = match &self.ffmpeg_path {
            Some(path) => FfmpegCommand::new_with_path(path),
            None => FfmpegCommand::new(),
        };
        cmd.args(args);
        cmd
    }

    fn run_phase(
        &self,
        phase: Phase,
        args: &[String],
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<PhaseOutcome> {
        log::debug!("Running ffmpeg ({}): ffmpeg {}", phase.label(), args.join(" "));

        let mut process = self.spawner.spawn(self.command(args))?;
        let mut tracker = PhaseTracker::new(phase);

        process.handle_events(|event| {
            match event {
                FfmpegEvent::ParsedDuration(parsed) => tracker.on_duration(parsed.duration),
                FfmpegEvent::Progress(update) => {
                    if let Some(phase_event) = tracker.on_time(&update.time) {
                        progress(phase_event);
                    }
                }
                FfmpegEvent::Log(LogLevel::Error | LogLevel::Fatal, line) | FfmpegEvent::Error(line) => {
                    tracker.on_error_line(&line)
                }
                _ => {}
            }
            Ok(())
        })?;

        let status = process.wait()?;
        if !status.success() {
            let message = format!("ffmpeg {} phase exited with {}", phase.label().to_lowercase(), status);
            return Ok(PhaseOutcome::Failed(tracker, message));
        }

        progress(tracker.finished());
        Ok(PhaseOutcome::Done)
    }

    fn phase_error(tracker: &PhaseTracker, message: String) -> CoreError {
        let details = tracker.error_text();
        if details.is_empty() {
            CoreError::Engine(message)
        } else {
            CoreError::Engine(format!("{message}: {details}"))
        }
    }

    fn transcode_audio(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        match self.run_phase(Phase::Audio, &audio_job_args(job, output), progress)? {
            PhaseOutcome::Done => Ok(()),
            PhaseOutcome::Failed(tracker, message) => Err(Self::phase_error(&tracker, message)),
        }
    }

    fn transcode_video(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        // Dropped on every return path, taking the scratch audio with it.
        let mut scratch_dir: Option<TempDir> = None;

        if let Some(audio_codec) = job.audio_codec() {
            let parent = self
                .temp_dir
                .clone()
                .or_else(|| {
                    output
                        .parent()
                        .filter(|dir| !dir.as_os_str().is_empty())
                        .map(Path::to_path_buf)
                })
                .unwrap_or_else(std::env::temp_dir);
            let dir = tempfile::Builder::new().prefix(".convoy-").tempdir_in(&parent)?;
            let scratch = dir.path().join(SCRATCH_AUDIO_FILE);

            match self.run_phase(Phase::Audio, &audio_track_args(job, audio_codec, &scratch), progress)? {
                PhaseOutcome::Done => scratch_dir = Some(dir),
                PhaseOutcome::Failed(tracker, _) if tracker.mentions_missing_stream() => {
                    log::warn!(
                        "{} has no audio track; converting without audio",
                        job.source_path().display()
                    );
                }
                PhaseOutcome::Failed(tracker, message) => {
                    return Err(Self::phase_error(&tracker, message));
                }
            }
        }

        let scratch = scratch_dir.as_ref().map(|dir| dir.path().join(SCRATCH_AUDIO_FILE));
        match self.run_phase(Phase::Video, &video_args(job, scratch.as_deref(), output), progress)? {
            PhaseOutcome::Done => Ok(()),
            PhaseOutcome::Failed(tracker, message) => Err(Self::phase_error(&tracker, message)),
        }
    }
}

impl<S: FfmpegSpawner> TranscodeEngine for FfmpegEngine<S> {
    fn transcode(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        match job.media_kind() {
            MediaKind::Video => self.transcode_video(job, output, progress),
            MediaKind::Audio => self.transcode_audio(job, output, progress),
            MediaKind::Image => Err(CoreError::Engine(format!(
                "ffmpeg engine does not convert images ({})",
                job.source_path().display()
            ))),
        }
    }
}
