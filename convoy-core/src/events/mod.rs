//! Batch events: the progress and result channel of the orchestrator.
//!
//! The orchestrator never talks to a UI. It emits [`BatchEvent`]s through an
//! [`EventDispatcher`], and any number of [`EventHandler`]s (terminal bars,
//! a JSON stream, push notifications, a plain channel) turn them into
//! whatever the front end needs.

use crate::progress::ProgressSnapshot;
use crate::result::BatchResult;

use serde::Serialize;

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::Arc;

pub mod json_handler;

pub use json_handler::JsonEventHandler;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchEvent {
    BatchStarted {
        total: usize,
        target_format: String,
        codec: String,
    },

    JobStarted {
        index: usize,
        total: usize,
        source: PathBuf,
    },

    Progress(ProgressSnapshot),

    JobCompleted {
        index: usize,
        source: PathBuf,
        output: PathBuf,
        elapsed_secs: f64,
    },

    JobFailed {
        index: usize,
        source: PathBuf,
        message: String,
    },

    BatchFinished(BatchResult),
}

pub trait EventHandler: Send + Sync {
    fn handle(&self, event: &BatchEvent);
}

impl<F> EventHandler for F
where
    F: Fn(&BatchEvent) + Send + Sync,
{
    fn handle(&self, event: &BatchEvent) {
        self(event)
    }
}

pub struct EventDispatcher {
    handlers: Vec<Arc<dyn EventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.handlers.push(handler);
    }

    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.add_handler(handler);
        self
    }

    pub fn emit(&self, event: BatchEvent) {
        for handler in &self.handlers {
            handler.handle(&event);
        }
    }
}

impl Default for EventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Forwards owned events into an mpsc channel.
///
/// A disconnected receiver is ignored; the batch keeps running.
pub struct ChannelEventHandler {
    sender: Sender<BatchEvent>,
}

impl ChannelEventHandler {
    pub fn new(sender: Sender<BatchEvent>) -> Self {
        Self { sender }
    }
}

impl EventHandler for ChannelEventHandler {
    fn handle(&self, event: &BatchEvent) {
        if self.sender.send(event.clone()).is_err() {
            log::debug!("Event receiver dropped; discarding event");
        }
    }
}

/// Discards every event.
pub struct NullEventHandler;

impl EventHandler for NullEventHandler {
    fn handle(&self, _event: &BatchEvent) {}
}
