//! Line-delimited JSON output of batch events.
//!
//! Each event becomes one JSON object on its own line, stamped with seconds
//! since the Unix epoch, so another process can follow a batch by reading
//! stdout.

use super::{BatchEvent, EventHandler};
use crate::progress::{Phase, ProgressSnapshot};
use serde_json::{json, Value};
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{SystemTime, UNIX_EPOCH};

/// Job, phase and file percent bucket of the last written progress line.
type ProgressKey = (usize, Phase, u32);

/// Writes every [`BatchEvent`] as one JSON line.
pub struct JsonEventHandler {
    output: Mutex<Box<dyn Write + Send>>,
    /// Progress lines are only written when the file percent crosses a
    /// whole-number step of this size, or the job or phase changes.
    progress_step: u32,
    last_progress: Mutex<Option<ProgressKey>>,
}

impl JsonEventHandler {
    /// Writes to stdout.
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            output: Mutex::new(writer),
            progress_step: 1,
            last_progress: Mutex::new(None),
        }
    }

    /// Throttles progress lines to one per `step` percent of the current
    /// file's phase.
    pub fn progress_step(mut self, step: u32) -> Self {
        self.progress_step = step.max(1);
        self
    }

    fn get_timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_json(&self, value: Value) {
        if let Ok(mut output) = self.output.lock() {
            if let Ok(json_str) = serde_json::to_string(&value) {
                let _ = writeln!(output, "{json_str}");
                let _ = output.flush();
            }
        }
    }

    fn should_emit_progress(&self, snapshot: &ProgressSnapshot) -> bool {
        // A finished file always gets its line.
        if snapshot.file_fraction >= 1.0 {
            return true;
        }
        let bucket = ((snapshot.file_fraction * 100.0).floor() as u32) / self.progress_step;
        let key = (snapshot.completed_count, snapshot.phase, bucket);
        match self.last_progress.lock() {
            Ok(mut last) => {
                if *last == Some(key) {
                    false
                } else {
                    *last = Some(key);
                    true
                }
            }
            Err(_) => true,
        }
    }

    fn reset_progress(&self) {
        if let Ok(mut last) = self.last_progress.lock() {
            *last = None;
        }
    }
}

impl Default for JsonEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler for JsonEventHandler {
    fn handle(&self, event: &BatchEvent) {
        match event {
            BatchEvent::JobStarted { .. } => self.reset_progress(),
            BatchEvent::Progress(snapshot) if !self.should_emit_progress(snapshot) => return,
            _ => {}
        }

        let mut value = match serde_json::to_value(event) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to serialize batch event: {e}");
                return;
            }
        };
        if let Value::Object(map) = &mut value {
            map.insert("timestamp".to_string(), json!(Self::get_timestamp()));
        }
        self.write_json(value);
    }
}
