// ============================================================================
// convoy-core/src/notifications/ntfy.rs
// ============================================================================
//
// NTFY BACKEND: Push Notifications Through ntfy.sh
//
// Delivers batch notices to an ntfy topic such as `https://ntfy.sh/convoy`.
// The topic URL is split into server and topic once, at construction, so a
// malformed URL is reported before the batch starts rather than on the first
// failure.
//
// KEY COMPONENTS:
// - NtfyNotificationSender: NotificationSender backed by the ntfy crate
// - parse_topic_url: https URL validation and splitting

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::notifications::{NotificationSender, NotificationType};

// ---- External crate imports ----
use ntfy::DispatcherBuilder;
use ntfy::payload::{Payload, Priority as NtfyPriority};

/// Sends notifications to an ntfy server.
///
/// # Examples
///
/// ```rust,no_run
/// use convoy_core::notifications::{NotificationSender, NotificationType, NtfyNotificationSender};
///
/// let sender = NtfyNotificationSender::new("https://ntfy.sh/convoy").unwrap();
/// sender
///     .send_notification(&NotificationType::BatchSucceeded { total: 4 })
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NtfyNotificationSender {
    topic_url: String,
    base_url: String,
    topic: String,
}

impl NtfyNotificationSender {
    /// Fails with `NotificationError` unless `topic_url` is `https://<host>/<topic>`.
    pub fn new(topic_url: &str) -> CoreResult<Self> {
        let (base_url, topic) = parse_topic_url(topic_url)?;
        Ok(Self {
            topic_url: topic_url.to_string(),
            base_url,
            topic,
        })
    }

    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }
}

impl NotificationSender for NtfyNotificationSender {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()> {
        let dispatcher = DispatcherBuilder::new(&self.base_url)
            .build_blocking()
            .map_err(|e| {
                CoreError::NotificationError(format!(
                    "Failed to build ntfy dispatcher for {}: {}",
                    self.base_url, e
                ))
            })?;

        let priority = map_priority(notification.get_priority()).unwrap_or_else(|| {
            log::warn!(
                "Invalid ntfy priority value provided: {}",
                notification.get_priority()
            );
            NtfyPriority::Default
        });

        let payload = Payload::new(&self.topic)
            .message(notification.get_message())
            .title(notification.get_title())
            .priority(priority)
            .tags(notification.get_tags());

        dispatcher.send(&payload).map_err(|e| {
            CoreError::NotificationError(format!(
                "Failed to send ntfy notification to {}: {}",
                self.topic_url, e
            ))
        })?;

        log::debug!("Sent ntfy notification: {}", notification.get_title());
        Ok(())
    }
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Splits `https://host/topic` into (`https://host`, `topic`).
fn parse_topic_url(topic_url: &str) -> CoreResult<(String, String)> {
    let after_scheme = topic_url.strip_prefix("https://").ok_or_else(|| {
        CoreError::NotificationError(format!(
            "Invalid ntfy topic URL '{topic_url}': must start with https://"
        ))
    })?;

    let (host, topic) = after_scheme.split_once('/').unwrap_or((after_scheme, ""));
    if host.is_empty() {
        return Err(CoreError::NotificationError(format!(
            "URL '{topic_url}' must have a non-empty host"
        )));
    }

    let topic = topic.trim_end_matches('/');
    if topic.is_empty() {
        return Err(CoreError::NotificationError(format!(
            "URL '{topic_url}' is missing topic path"
        )));
    }

    Ok((format!("https://{host}"), topic.to_string()))
}

/// 1 -> Min, 2 -> Low, 3 -> Default, 4 -> High, 5 -> Max.
fn map_priority(p: u8) -> Option<NtfyPriority> {
    match p {
        1 => Some(NtfyPriority::Min),
        2 => Some(NtfyPriority::Low),
        3 => Some(NtfyPriority::Default),
        4 => Some(NtfyPriority::High),
        5 => Some(NtfyPriority::Max),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topic_url_is_split() {
        let (base, topic) = parse_topic_url("https://ntfy.sh/convoy").unwrap();
        assert_eq!(base, "https://ntfy.sh");
        assert_eq!(topic, "convoy");

        let sender = NtfyNotificationSender::new("https://push.example.org/media/").unwrap();
        assert_eq!(sender.topic, "media");
        assert_eq!(sender.base_url, "https://push.example.org");
    }

    #[test]
    fn test_invalid_topic_urls_are_rejected() {
        for url in ["http://ntfy.sh/convoy", "https:///convoy", "https://ntfy.sh", "https://ntfy.sh/", "ntfy.sh/convoy"] {
            let err = NtfyNotificationSender::new(url).unwrap_err();
            assert!(matches!(err, CoreError::NotificationError(_)), "{url}");
        }
    }

    #[test]
    fn test_priority_mapping() {
        assert!(matches!(map_priority(1), Some(NtfyPriority::Min)));
        assert!(matches!(map_priority(5), Some(NtfyPriority::Max)));
        assert!(map_priority(0).is_none());
        assert!(map_priority(6).is_none());
    }
}
