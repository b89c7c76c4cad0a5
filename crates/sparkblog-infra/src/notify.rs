//! Notifier that writes notifications to the log.

use sparkblog_core::ports::{Notification, NotificationLevel, Notifier};

/// Sends every notification to `tracing`. Destructive ones are warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => tracing::info!(
                title = %notification.title,
                "{}",
                notification.description
            ),
            NotificationLevel::Destructive => tracing::warn!(
                title = %notification.title,
                "{}",
                notification.description
            ),
        }
    }
}
