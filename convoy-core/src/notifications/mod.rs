//! Notifications for batch outcomes.
//!
//! Failed files and finished batches are announced through a
//! [`NotificationSender`]; the ntfy.sh backend delivers them as push
//! notifications.
mod abstraction;
mod handler;
mod ntfy;

pub use abstraction::{NotificationSender, NotificationType, NullNotificationSender};
pub use handler::NotificationEventHandler;
pub use ntfy::NtfyNotificationSender;
