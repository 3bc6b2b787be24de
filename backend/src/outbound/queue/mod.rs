//! Queue-backed achievement notification sink.
//!
//! Awards publish onto an unbounded Tokio channel so the award path never
//! waits on delivery. A consumer task drains the channel; the default
//! consumer logs each notification, and a push or email adapter would
//! replace it.

use async_trait::async_trait;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::info;

use crate::domain::achievements::AchievementNotification;
use crate::domain::ports::{AchievementNotificationSink, NotificationSinkError};

/// Producer half handed to the achievement coordinator.
#[derive(Debug, Clone)]
pub struct QueuedNotificationSink {
    sender: UnboundedSender<AchievementNotification>,
}

/// Consumer half of the notification channel.
#[derive(Debug)]
pub struct NotificationQueue {
    receiver: UnboundedReceiver<AchievementNotification>,
}

/// Create a connected sink and queue.
pub fn notification_channel() -> (QueuedNotificationSink, NotificationQueue) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        QueuedNotificationSink { sender },
        NotificationQueue { receiver },
    )
}

#[async_trait]
impl AchievementNotificationSink for QueuedNotificationSink {
    async fn publish(
        &self,
        notification: AchievementNotification,
    ) -> Result<(), NotificationSinkError> {
        self.sender
            .send(notification)
            .map_err(|_| NotificationSinkError::closed())
    }
}

impl NotificationQueue {
    /// Next notification, or `None` once every sink is dropped.
    pub async fn recv(&mut self) -> Option<AchievementNotification> {
        self.receiver.recv().await
    }

    /// Spawn a task that logs notifications until the channel closes.
    pub fn spawn_logger(mut self) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(notification) = self.recv().await {
                info!(
                    achievement_id = %notification.achievement_id,
                    rank = %notification.rank,
                    xp_reward = notification.xp_reward,
                    "achievement unlocked"
                );
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::achievements::{AchievementNotification, Requirement};
    use crate::test_support::achievement;
    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    fn notification() -> AchievementNotification {
        let definition = achievement("streak-3", 15, Requirement::Streak { days: 3 });
        AchievementNotification::for_award(
            &definition,
            Utc.with_ymd_and_hms(2025, 3, 3, 8, 0, 0)
                .single()
                .expect("valid timestamp"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn published_notifications_reach_the_queue() {
        let (sink, mut queue) = notification_channel();

        sink.publish(notification()).await.expect("publish");

        assert_eq!(queue.recv().await, Some(notification()));
    }

    #[rstest]
    #[tokio::test]
    async fn publishing_after_consumer_drop_reports_closed() {
        let (sink, queue) = notification_channel();
        drop(queue);

        let err = sink.publish(notification()).await.expect_err("closed");

        assert_eq!(err, NotificationSinkError::closed());
    }
}
