//! Port for handing award notifications to the presentation layer.

use async_trait::async_trait;

use crate::domain::achievements::AchievementNotification;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification sinks.
    pub enum NotificationSinkError {
        /// The consumer side of the queue has gone away.
        Closed @ Processing => "notification queue is closed",
        /// Delivery to an external sink failed.
        Delivery { message: String } @ Network =>
            "notification delivery failed: {message}",
    }
}

/// Enqueue-only sink. Notifications are queued in order, never replaced.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AchievementNotificationSink: Send + Sync {
    async fn publish(&self, notification: AchievementNotification)
    -> Result<(), NotificationSinkError>;
}

/// Fixture implementation that drops every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureAchievementNotificationSink;

#[async_trait]
impl AchievementNotificationSink for FixtureAchievementNotificationSink {
    async fn publish(
        &self,
        _notification: AchievementNotification,
    ) -> Result<(), NotificationSinkError> {
        Ok(())
    }
}
