// ============================================================================
// convoy-core/src/notifications/abstraction.rs
// ============================================================================
//
// NOTIFICATION ABSTRACTION: What Gets Announced and Who Delivers It
//
// A batch produces two kinds of user-facing notices: one per failed file,
// raised the moment it fails, and exactly one final notice summarising the
// whole batch. This module describes those notices and the trait a delivery
// backend implements.
//
// KEY COMPONENTS:
// - NotificationType: The notices a batch can raise
// - NotificationSender: Trait for delivery backends
// - NullNotificationSender: No-op backend

// ---- Internal crate imports ----
use crate::error::CoreResult;
use crate::utils::display_name;

// ---- Standard library imports ----
use std::path::PathBuf;

// ============================================================================
// NOTIFICATION TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationType {
    /// One file of the batch failed; the batch continues.
    JobFailed {
        source: PathBuf,
        message: String,
    },

    /// Every file of the batch converted.
    BatchSucceeded { total: usize },

    /// The batch finished with at least one failed file.
    BatchPartialFailure {
        total: usize,
        succeeded: usize,
        failed: Vec<PathBuf>,
    },
}

impl NotificationType {
    pub fn get_title(&self) -> String {
        match self {
            NotificationType::JobFailed { .. } => "Conversion Failed".to_string(),
            NotificationType::BatchSucceeded { .. } => "Conversion Complete".to_string(),
            NotificationType::BatchPartialFailure { .. } => {
                "Conversion Finished With Errors".to_string()
            }
        }
    }

    pub fn get_message(&self) -> String {
        match self {
            NotificationType::JobFailed { source, message } => {
                format!("Failed to convert {}: {}", display_name(source), message)
            }
            NotificationType::BatchSucceeded { total } => {
                format!("Converted {total} of {total} file(s)")
            }
            NotificationType::BatchPartialFailure {
                total,
                succeeded,
                failed,
            } => {
                let names: Vec<String> = failed.iter().map(|path| display_name(path)).collect();
                format!(
                    "Converted {succeeded} of {total} file(s). Failed: {}",
                    names.join(", ")
                )
            }
        }
    }

    /// Priority level 1-5, 5 being highest.
    pub fn get_priority(&self) -> u8 {
        match self {
            NotificationType::JobFailed { .. } => 4,
            NotificationType::BatchSucceeded { .. } => 3,
            NotificationType::BatchPartialFailure { .. } => 5,
        }
    }

    pub fn get_tags(&self) -> Vec<String> {
        let kind = match self {
            NotificationType::JobFailed { .. } => "error",
            NotificationType::BatchSucceeded { .. } => "complete",
            NotificationType::BatchPartialFailure { .. } => "warning",
        };
        vec!["convoy".to_string(), kind.to_string()]
    }
}

// ============================================================================
// NOTIFICATION SENDER
// ============================================================================

/// Delivery backend for notifications.
pub trait NotificationSender: Send + Sync {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()>;
}

/// Backend that drops every notification.
#[derive(Debug, Clone, Default)]
pub struct NullNotificationSender;

impl NotificationSender for NullNotificationSender {
    fn send_notification(&self, _notification: &NotificationType) -> CoreResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_failure_message_lists_failed_files() {
        let notice = NotificationType::BatchPartialFailure {
            total: 3,
            succeeded: 1,
            failed: vec![PathBuf::from("/in/a.avi"), PathBuf::from("/in/c.avi")],
        };
        assert_eq!(notice.get_message(), "Converted 1 of 3 file(s). Failed: a.avi, c.avi");
        assert_eq!(notice.get_priority(), 5);
    }

    #[test]
    fn test_job_failed_uses_file_name() {
        let notice = NotificationType::JobFailed {
            source: PathBuf::from("/in/clip.mov"),
            message: "Engine error: corrupt input".into(),
        };
        assert_eq!(notice.get_title(), "Conversion Failed");
        assert!(notice.get_message().starts_with("Failed to convert clip.mov"));
        assert_eq!(notice.get_tags(), vec!["convoy", "error"]);
    }
}
