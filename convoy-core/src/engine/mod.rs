// ============================================================================
// convoy-core/src/engine/mod.rs
// ============================================================================
//
// TRANSCODING ENGINES: The External Collaborators That Do the Encoding
//
// The orchestrator hands every job to a TranscodeEngine together with the
// resolved output path and a progress hook. The engine either writes the
// output and returns Ok, or returns the error that failed the job. Engines
// report raw phase counters through the hook; turning those into progress
// bars is the aggregator's job.
//
// KEY COMPONENTS:
// - TranscodeEngine: The engine seam used by the orchestrator
// - MediaEngine: Routes jobs to the ffmpeg or image engine by media kind
// - check_dependency: Preflight check for external binaries

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::job::ConversionJob;
use crate::progress::PhaseEvent;
use crate::registry::MediaKind;

// ---- Standard library imports ----
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

pub mod ffmpeg;
pub mod ffmpeg_executor;
pub mod image;

pub use self::ffmpeg::FfmpegEngine;
pub use self::ffmpeg_executor::{FfmpegProcess, FfmpegSpawner, SidecarProcess, SidecarSpawner};
pub use self::image::ImageEngine;

// ============================================================================
// ENGINE TRAIT
// ============================================================================

/// Performs the actual conversion of one job.
///
/// `progress` is called synchronously from inside `transcode`, any number of
/// times, with the counters of the phase currently running. A job owns
/// whatever handles it opens; they must be released before `transcode`
/// returns, whether it succeeds or fails.
pub trait TranscodeEngine {
    fn transcode(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()>;
}

impl<T: TranscodeEngine + ?Sized> TranscodeEngine for &T {
    fn transcode(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        (**self).transcode(job, output, progress)
    }
}

/// Routes video and audio jobs to ffmpeg and image jobs to the image codecs.
#[derive(Debug, Clone, Default)]
pub struct MediaEngine<S: FfmpegSpawner = SidecarSpawner> {
    ffmpeg: FfmpegEngine<S>,
    image: ImageEngine,
}

impl MediaEngine<SidecarSpawner> {
    /// Engine honouring the ffmpeg binary and scratch directory of `config`.
    pub fn from_config(config: &CoreConfig) -> Self {
        let mut ffmpeg = FfmpegEngine::new();
        if let Some(path) = &config.ffmpeg_path {
            ffmpeg = ffmpeg.ffmpeg_path(path);
        }
        if let Some(dir) = &config.temp_dir {
            ffmpeg = ffmpeg.temp_dir(dir);
        }
        Self::new(ffmpeg)
    }
}

impl<S: FfmpegSpawner> MediaEngine<S> {
    pub fn new(ffmpeg: FfmpegEngine<S>) -> Self {
        Self {
            ffmpeg,
            image: ImageEngine::new(),
        }
    }
}

impl<S: FfmpegSpawner> TranscodeEngine for MediaEngine<S> {
    fn transcode(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        match job.media_kind() {
            MediaKind::Video | MediaKind::Audio => self.ffmpeg.transcode(job, output, progress),
            MediaKind::Image => self.image.transcode(job, output, progress),
        }
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Checks that `cmd_name` can be started by running `cmd_name -version`.
///
/// Fails with `DependencyNotFound` when the binary does not exist and with
/// `CommandStart` when it exists but cannot be started.
pub fn check_dependency(cmd_name: &str) -> CoreResult<()> {
    let result = Command::new(cmd_name)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();

    match result {
        Ok(_) => {
            log::debug!("Found dependency: {cmd_name}");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            log::warn!("Dependency '{cmd_name}' not found.");
            Err(CoreError::DependencyNotFound(cmd_name.to_string()))
        }
        Err(e) => {
            log::error!("Failed to start dependency check command '{cmd_name}': {e}");
            Err(CoreError::CommandStart(cmd_name.to_string(), e))
        }
    }
}
