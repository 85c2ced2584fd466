// ============================================================================
// convoy-core/src/orchestrator.rs
// ============================================================================
//
// BATCH ORCHESTRATION: Driving a Batch of Conversions File by File
//
// The orchestrator turns a list of source files plus one ConversionRequest
// into a sequence of jobs, runs them through the transcoding engine one at a
// time and reports progress and outcomes as BatchEvents.
//
// WORKFLOW:
// 1. Validate the request against the capability registry. An invalid
//    request is returned as an error and no job runs.
// 2. For each source, in input order:
//    a. Build the job and announce it (JobStarted, first Progress snapshot)
//    b. Resolve a free output path
//    c. Run the engine, folding its phase counters into Progress snapshots
//    d. Record success, or record the failure and move on
//    e. Close the job in the aggregator, whatever the outcome
// 3. Emit the BatchResult and return it
//
// KEY COMPONENTS:
// - BatchOrchestrator: Owns the engine, the output location and the
//   event dispatcher for a run

// ---- Internal crate imports ----
use crate::config::CoreConfig;
use crate::engine::TranscodeEngine;
use crate::error::{CoreError, CoreResult};
use crate::events::{BatchEvent, EventDispatcher, EventHandler};
use crate::job::{ConversionJob, ConversionRequest};
use crate::output_path::{output_base_for, resolve_output_path};
use crate::progress::ProgressAggregator;
use crate::registry::{CapabilityRegistry, MediaKind};
use crate::result::{BatchResult, JobFailure};
use crate::utils::display_name;

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Runs batches of conversions through one engine.
///
/// # Examples
///
/// ```rust,no_run
/// use convoy_core::{BatchOrchestrator, CapabilityRegistry, ConversionRequest, CoreConfig, MediaEngine};
/// use std::path::PathBuf;
///
/// let config = CoreConfig::default();
/// let orchestrator = BatchOrchestrator::new(MediaEngine::from_config(&config), CapabilityRegistry::global())
///     .with_config(&config);
///
/// let sources = vec![PathBuf::from("clip1.avi"), PathBuf::from("clip2.avi")];
/// let request = ConversionRequest::new("mp4").codec("libx264");
/// let result = orchestrator.run(&sources, &request).unwrap();
/// println!("{} of {} converted", result.succeeded(), result.total());
/// ```
pub struct BatchOrchestrator<'r, E: TranscodeEngine> {
    engine: E,
    registry: &'r CapabilityRegistry,
    dispatcher: EventDispatcher,
    output_dir: Option<PathBuf>,
}

impl<'r, E: TranscodeEngine> BatchOrchestrator<'r, E> {
    pub fn new(engine: E, registry: &'r CapabilityRegistry) -> Self {
        Self {
            engine,
            registry,
            dispatcher: EventDispatcher::new(),
            output_dir: None,
        }
    }

    /// Applies the output location of `config`.
    pub fn with_config(mut self, config: &CoreConfig) -> Self {
        self.output_dir = config.output_dir.clone();
        self
    }

    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.dispatcher.add_handler(handler);
        self
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.dispatcher.add_handler(handler);
    }

    /// Converts every source with the selections of `request`.
    ///
    /// Returns `Err` only when the request itself is invalid, before any job
    /// has started. Per-file failures are collected in the returned
    /// [`BatchResult`] and never stop the batch.
    pub fn run(&self, sources: &[PathBuf], request: &ConversionRequest) -> CoreResult<BatchResult> {
        let template = request.validate(self.registry)?;
        let total = sources.len();

        log::info!(
            "Starting batch: {} file(s) -> {} ({})",
            total,
            template.target_format(),
            template.codec()
        );
        self.dispatcher.emit(BatchEvent::BatchStarted {
            total,
            target_format: template.target_format().to_string(),
            codec: template.codec().to_string(),
        });

        let mut aggregator = ProgressAggregator::new(total);
        let mut succeeded = 0;
        let mut failures = Vec::new();

        for (index, source) in sources.iter().enumerate() {
            let job = template.job_for(source);
            let audio_then_video = job.media_kind() == MediaKind::Video && job.audio_enabled();

            log::info!("[{}/{}] Converting {}", index + 1, total, source.display());
            self.dispatcher.emit(BatchEvent::JobStarted {
                index,
                total,
                source: source.clone(),
            });
            let snapshot = aggregator.on_job_start(index, &display_name(source), audio_then_video);
            self.dispatcher.emit(BatchEvent::Progress(snapshot));

            let started = Instant::now();
            match self.run_job(&job, &mut aggregator) {
                Ok(output) => {
                    succeeded += 1;
                    let elapsed = started.elapsed();
                    log::info!(
                        "Converted {} -> {} in {:.1}s",
                        source.display(),
                        output.display(),
                        elapsed.as_secs_f64()
                    );
                    self.dispatcher.emit(BatchEvent::JobCompleted {
                        index,
                        source: source.clone(),
                        output,
                        elapsed_secs: elapsed.as_secs_f64(),
                    });
                }
                Err(e) => {
                    let message = e.to_string();
                    log::error!("Failed to convert {}: {}", source.display(), message);
                    self.dispatcher.emit(BatchEvent::JobFailed {
                        index,
                        source: source.clone(),
                        message: message.clone(),
                    });
                    failures.push(JobFailure {
                        source_path: source.clone(),
                        message,
                    });
                }
            }

            let snapshot = aggregator.on_job_end(index);
            self.dispatcher.emit(BatchEvent::Progress(snapshot));
        }

        let result = BatchResult::new(total, succeeded, failures);
        if result.is_success() {
            log::info!("Batch complete: {}/{} converted", result.succeeded(), result.total());
        } else {
            log::warn!(
                "Batch finished with failures: {}/{} converted, {} failed",
                result.succeeded(),
                result.total(),
                result.failures().len()
            );
        }
        self.dispatcher.emit(BatchEvent::BatchFinished(result.clone()));
        Ok(result)
    }

    fn run_job(&self, job: &ConversionJob, aggregator: &mut ProgressAggregator) -> CoreResult<PathBuf> {
        if let Some(dir) = &self.output_dir {
            ensure_dir(dir)?;
        }

        let base = output_base_for(job.source_path(), self.output_dir.as_deref());
        let output = resolve_output_path(&base, job.target_format())?;

        let dispatcher = &self.dispatcher;
        self.engine.transcode(job, &output, &mut |event| {
            if let Some(snapshot) = aggregator.on_phase_event(event) {
                dispatcher.emit(BatchEvent::Progress(snapshot));
            }
        })?;

        Ok(output)
    }
}

fn ensure_dir(dir: &Path) -> CoreResult<()> {
    fs::create_dir_all(dir).map_err(|source| CoreError::PathResolution {
        path: dir.to_path_buf(),
        source,
    })
}
