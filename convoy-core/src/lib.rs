//! Core library for batch media conversion.
//!
//! This crate turns a list of source files plus one set of conversion
//! selections into a batch of isolated jobs, runs them one at a time through
//! ffmpeg or the image codecs, reports two-level progress (current file and
//! whole batch) and collects per-file failures without stopping the batch.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use convoy_core::events::JsonEventHandler;
//! use convoy_core::notifications::{NotificationEventHandler, NtfyNotificationSender};
//! use convoy_core::{
//!     BatchOrchestrator, CapabilityRegistry, ConversionRequest, CoreConfigBuilder, FpsMode,
//!     MediaEngine, MediaKind,
//! };
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! let config = CoreConfigBuilder::new()
//!     .output_dir("/media/converted")
//!     .ntfy_topic("https://ntfy.sh/my-topic")
//!     .build();
//! config.validate().unwrap();
//!
//! let sources = convoy_core::find_convertible_files(Path::new("/media/incoming"), MediaKind::Video).unwrap();
//! let request = ConversionRequest::new("mp4")
//!     .codec("libx264")
//!     .fps(FpsMode::Auto)
//!     .audio(true);
//!
//! let sender = NtfyNotificationSender::new("https://ntfy.sh/my-topic").unwrap();
//! let orchestrator = BatchOrchestrator::new(MediaEngine::from_config(&config), CapabilityRegistry::global())
//!     .with_config(&config)
//!     .with_handler(Arc::new(JsonEventHandler::new()))
//!     .with_handler(Arc::new(NotificationEventHandler::new(Arc::new(sender))));
//!
//! let result = orchestrator.run(&sources, &request).unwrap();
//! for failure in result.failures() {
//!     eprintln!("{}: {}", failure.source_path.display(), failure.message);
//! }
//! ```

pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod events;
pub mod job;
pub mod notifications;
pub mod orchestrator;
pub mod output_path;
pub mod progress;
pub mod registry;
pub mod result;
pub mod utils;

// Re-exports for public API
pub use config::{CoreConfig, CoreConfigBuilder};
pub use discovery::find_convertible_files;
pub use engine::{FfmpegEngine, ImageEngine, MediaEngine, TranscodeEngine, check_dependency};
pub use error::{CoreError, CoreResult};
pub use events::{BatchEvent, EventDispatcher, EventHandler};
pub use job::{ConversionJob, ConversionRequest, FpsMode, JobTemplate, QualityTier};
pub use orchestrator::BatchOrchestrator;
pub use output_path::resolve_output_path;
pub use progress::{Phase, PhaseEvent, ProgressAggregator, ProgressSnapshot};
pub use registry::{CapabilityEntry, CapabilityRegistry, MediaKind};
pub use result::{BatchOutcome, BatchResult, JobFailure};
pub use utils::{format_bytes, format_duration, parse_ffmpeg_time};
