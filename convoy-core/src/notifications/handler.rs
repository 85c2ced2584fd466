//! Bridges batch events to a [`NotificationSender`].

use super::{NotificationSender, NotificationType};
use crate::events::{BatchEvent, EventHandler};
use crate::result::BatchOutcome;

use std::sync::Arc;

/// Raises a notice per failed job as it happens and one final notice per
/// batch. Delivery errors are logged and otherwise ignored.
pub struct NotificationEventHandler {
    sender: Arc<dyn NotificationSender>,
}

impl NotificationEventHandler {
    pub fn new(sender: Arc<dyn NotificationSender>) -> Self {
        Self { sender }
    }

    fn notify(&self, notification: NotificationType) {
        if let Err(e) = self.sender.send_notification(&notification) {
            log::warn!("Failed to send notification '{}': {}", notification.get_title(), e);
        }
    }
}

impl EventHandler for NotificationEventHandler {
    fn handle(&self, event: &BatchEvent) {
        match event {
            BatchEvent::JobFailed { source, message, .. } => {
                self.notify(NotificationType::JobFailed {
                    source: source.clone(),
                    message: message.clone(),
                });
            }
            BatchEvent::BatchFinished(result) => {
                let notification = match result.outcome() {
                    BatchOutcome::Success => NotificationType::BatchSucceeded {
                        total: result.total(),
                    },
                    BatchOutcome::PartialFailure => NotificationType::BatchPartialFailure {
                        total: result.total(),
                        succeeded: result.succeeded(),
                        failed: result.failed_sources().map(|path| path.to_path_buf()).collect(),
                    },
                };
                self.notify(notification);
            }
            _ => {}
        }
    }
}
