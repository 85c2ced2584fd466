// ============================================================================
// convoy-core/src/engine/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Spawning ffmpeg and Reading Its Event Stream
//
// The ffmpeg engine never spawns processes directly. It goes through the
// FfmpegSpawner seam so a test can hand it a scripted process that replays
// a fixed event stream and exit status.
//
// KEY COMPONENTS:
// - FfmpegProcess: A running ffmpeg instance
// - FfmpegSpawner: Creates FfmpegProcess values from an FfmpegCommand
// - SidecarSpawner / SidecarProcess: ffmpeg-sidecar implementation

// ---- Internal crate imports ----
use crate::error::{CoreResult, command_failed_error, command_start_error};

// ---- External crate imports ----
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;

// ---- Standard library imports ----
use std::process::ExitStatus;

/// An active ffmpeg process.
pub trait FfmpegProcess {
    /// Feeds every event of the running command to `handler`, stopping at
    /// the first error it returns.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Something that can start an [`FfmpegProcess`].
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// `ffmpeg_sidecar` child process.
pub struct SidecarProcess(FfmpegChild);

impl FfmpegProcess for SidecarProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = match self.0.iter() {
            Ok(iterator) => iterator,
            Err(e) => {
                log::error!("Failed to get ffmpeg event iterator: {e}");
                // Nobody will read this child's output, so stop and reap it here.
                if let Err(kill_err) = self.0.kill() {
                    log::warn!("Failed to kill ffmpeg: {kill_err}");
                }
                let status = self.0.wait().unwrap_or_default();
                return Err(command_failed_error("ffmpeg (event iterator)", status, e.to_string()));
            }
        };
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0.wait().map_err(|e| command_start_error("ffmpeg (wait)", e))
    }
}

#[derive(Debug, Clone, Default)]
pub struct SidecarSpawner;

impl FfmpegSpawner for SidecarSpawner {
    type Process = SidecarProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarProcess)
            .map_err(|e| command_start_error("ffmpeg", e))
    }
}
