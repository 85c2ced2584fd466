// convoy-core/tests/common/mod.rs
//
// Shared fixtures for the orchestrator integration tests.

#![allow(dead_code)]

use convoy_core::engine::TranscodeEngine;
use convoy_core::error::{CoreError, CoreResult};
use convoy_core::events::{BatchEvent, ChannelEventHandler};
use convoy_core::notifications::{NotificationSender, NotificationType};
use convoy_core::progress::{Phase, PhaseEvent};
use convoy_core::{ConversionJob, MediaKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

/// What the scripted engine does for one source file.
#[derive(Debug, Clone)]
pub struct Script {
    pub events: Vec<PhaseEvent>,
    pub failure: Option<String>,
}

/// A recorded call into the engine.
#[derive(Debug, Clone)]
pub struct EngineCall {
    pub job: ConversionJob,
    pub output: PathBuf,
}

/// Engine that replays scripted phase events and failures per source file
/// name, and creates an empty output file for every successful job.
#[derive(Default)]
pub struct ScriptedEngine {
    scripts: HashMap<String, Script>,
    calls: RefCell<Vec<EngineCall>>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the job for `file_name` fail with `message` after `events`.
    pub fn fail(mut self, file_name: &str, events: Vec<PhaseEvent>, message: &str) -> Self {
        self.scripts.insert(
            file_name.to_string(),
            Script {
                events,
                failure: Some(message.to_string()),
            },
        );
        self
    }

    /// Replays `events` for `file_name`, then succeeds.
    pub fn succeed_with(mut self, file_name: &str, events: Vec<PhaseEvent>) -> Self {
        self.scripts
            .insert(file_name.to_string(), Script { events, failure: None });
        self
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.calls.borrow().clone()
    }

    fn default_events(job: &ConversionJob) -> Vec<PhaseEvent> {
        let mut events = Vec::new();
        match job.media_kind() {
            MediaKind::Video => {
                if job.audio_enabled() {
                    events.extend([
                        PhaseEvent::new(Phase::Audio, 500, 1000),
                        PhaseEvent::new(Phase::Audio, 1000, 1000),
                    ]);
                }
                events.extend([
                    PhaseEvent::new(Phase::Video, 300, 1000),
                    PhaseEvent::new(Phase::Video, 700, 1000),
                    PhaseEvent::new(Phase::Video, 1000, 1000),
                ]);
            }
            MediaKind::Audio => events.extend([
                PhaseEvent::new(Phase::Audio, 400, 1000),
                PhaseEvent::new(Phase::Audio, 1000, 1000),
            ]),
            MediaKind::Image => {}
        }
        events
    }
}

impl TranscodeEngine for ScriptedEngine {
    fn transcode(
        &self,
        job: &ConversionJob,
        output: &Path,
        progress: &mut dyn FnMut(PhaseEvent),
    ) -> CoreResult<()> {
        self.calls.borrow_mut().push(EngineCall {
            job: job.clone(),
            output: output.to_path_buf(),
        });

        let name = job
            .source_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let script = self.scripts.get(&name).cloned().unwrap_or_else(|| Script {
            events: Self::default_events(job),
            failure: None,
        });

        for event in script.events {
            progress(event);
        }
        if let Some(message) = script.failure {
            return Err(CoreError::Engine(message));
        }
        File::create(output)?;
        Ok(())
    }
}

/// Channel-backed event capture.
pub fn event_channel() -> (Arc<ChannelEventHandler>, Receiver<BatchEvent>) {
    let (tx, rx) = mpsc::channel();
    (Arc::new(ChannelEventHandler::new(tx)), rx)
}

/// Notification sender that remembers everything it was asked to send.
#[derive(Default)]
pub struct RecordingSender {
    pub sent: Mutex<Vec<NotificationType>>,
}

impl NotificationSender for RecordingSender {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// `names` as paths inside `dir`.
pub fn sources_in(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names.iter().map(|name| dir.join(name)).collect()
}

/// In-memory writer whose contents stay readable after it is boxed away.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Each written line parsed as JSON.
    pub fn json_lines(&self) -> Vec<serde_json::Value> {
        let bytes = self.0.lock().unwrap().clone();
        String::from_utf8(bytes)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
