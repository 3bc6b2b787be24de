//! Achievement progress reads and writes.
//!
//! Reads go straight to the repository. Writes retry transient failures
//! under the shared [`RetryPolicy`](super::RetryPolicy); a batch is retried
//! as a whole, never partially replayed.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::achievements::{AchievementId, AchievementProgress, ProgressUpdate};
use super::ports::{AchievementProgressQuery, AchievementProgressRepository};
use super::retry::RetryExecutor;
use super::{Error, UserId};

/// Progress store service backed by an [`AchievementProgressRepository`].
#[derive(Clone)]
pub struct AchievementProgressService {
    repository: Arc<dyn AchievementProgressRepository>,
    retry: RetryExecutor,
}

impl AchievementProgressService {
    pub fn new(repository: Arc<dyn AchievementProgressRepository>, retry: RetryExecutor) -> Self {
        Self { repository, retry }
    }

    /// Stored progress, or `None` when the pair is not tracked yet.
    pub async fn get_progress(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, Error> {
        self.repository
            .find(user_id, achievement_id)
            .await
            .map_err(Error::from)
    }

    /// Upsert one record.
    #[instrument(skip_all, fields(user_id = %user_id, achievement_id = %achievement_id))]
    pub async fn update_progress(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
        current: u64,
        total: u64,
        is_complete: bool,
    ) -> Result<(), Error> {
        let update = ProgressUpdate::new(achievement_id.clone(), current, total, is_complete);
        self.retry
            .execute(
                "update_progress",
                || self.repository.upsert(user_id, &update),
                |err| err.is_transient(),
            )
            .await
            .map_err(Error::from)
    }

    /// Upsert several records as one atomic write.
    ///
    /// Duplicate ids collapse to their last entry. An empty batch is a
    /// no-op.
    #[instrument(skip_all, fields(user_id = %user_id, batch_len = updates.len()))]
    pub async fn batch_update_progress(
        &self,
        user_id: &UserId,
        updates: Vec<ProgressUpdate>,
    ) -> Result<(), Error> {
        let updates = dedupe_last_wins(updates);
        if updates.is_empty() {
            return Ok(());
        }
        self.retry
            .execute(
                "batch_update_progress",
                || self.repository.upsert_batch(user_id, &updates),
                |err| err.is_transient(),
            )
            .await
            .map_err(Error::from)?;
        debug!(written = updates.len(), "progress batch written");
        Ok(())
    }
}

fn dedupe_last_wins(updates: Vec<ProgressUpdate>) -> Vec<ProgressUpdate> {
    let mut positions: HashMap<AchievementId, usize> = HashMap::new();
    let mut result: Vec<ProgressUpdate> = Vec::with_capacity(updates.len());
    for update in updates {
        match positions.get(&update.achievement_id) {
            Some(&index) => result[index] = update,
            None => {
                positions.insert(update.achievement_id.clone(), result.len());
                result.push(update);
            }
        }
    }
    result
}

#[async_trait]
impl AchievementProgressQuery for AchievementProgressService {
    async fn get_progress(
        &self,
        user_id: &UserId,
        achievement_id: &AchievementId,
    ) -> Result<Option<AchievementProgress>, Error> {
        AchievementProgressService::get_progress(self, user_id, achievement_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{AchievementProgressRepositoryError, MockAchievementProgressRepository};
    use crate::test_support::instant_retry;
    use mockall::Sequence;
    use rstest::rstest;

    fn service(repo: MockAchievementProgressRepository) -> AchievementProgressService {
        AchievementProgressService::new(
            Arc::new(repo),
            instant_retry(3),
        )
    }

    fn id(raw: &'static str) -> AchievementId {
        AchievementId::from_static(raw)
    }

    #[tokio::test]
    async fn get_progress_returns_none_when_untracked() {
        let mut repo = MockAchievementProgressRepository::new();
        repo.expect_find().times(1).return_once(|_, _| Ok(None));

        let progress = service(repo)
            .get_progress(&UserId::random(), &id("streak-3"))
            .await
            .expect("lookup");

        assert!(progress.is_none());
    }

    #[tokio::test]
    async fn get_progress_does_not_retry() {
        let mut repo = MockAchievementProgressRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(|_, _| Err(AchievementProgressRepositoryError::timeout("slow")));

        let err = service(repo)
            .get_progress(&UserId::random(), &id("streak-3"))
            .await
            .expect_err("timeout");

        assert_eq!(err.code(), ErrorCode::Network);
    }

    #[tokio::test]
    async fn update_retries_transient_failures() {
        let mut repo = MockAchievementProgressRepository::new();
        let mut seq = Sequence::new();
        repo.expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _| Err(AchievementProgressRepositoryError::connection("reset")));
        repo.expect_upsert()
            .times(1)
            .in_sequence(&mut seq)
            .withf(|_, update| update.current_value == 2 && update.target_value == 3)
            .return_once(|_, _| Ok(()));

        service(repo)
            .update_progress(&UserId::random(), &id("streak-3"), 2, 3, false)
            .await
            .expect("update succeeds on second attempt");
    }

    #[tokio::test]
    async fn batch_surfaces_failure_after_bounded_attempts() {
        let mut repo = MockAchievementProgressRepository::new();
        repo.expect_upsert_batch()
            .times(3)
            .returning(|_, _| Err(AchievementProgressRepositoryError::query("deadlock")));

        let err = service(repo)
            .batch_update_progress(
                &UserId::random(),
                vec![ProgressUpdate::new(id("pr-first"), 1, 1, true)],
            )
            .await
            .expect_err("exhausted");

        assert_eq!(err.code(), ErrorCode::Database);
    }

    #[tokio::test]
    async fn batch_does_not_retry_permanent_failures() {
        let mut repo = MockAchievementProgressRepository::new();
        repo.expect_upsert_batch()
            .times(1)
            .returning(|_, _| Err(AchievementProgressRepositoryError::unknown_achievement("x")));

        let err = service(repo)
            .batch_update_progress(
                &UserId::random(),
                vec![ProgressUpdate::new(id("pr-first"), 1, 1, true)],
            )
            .await
            .expect_err("permanent");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn empty_batch_skips_repository() {
        let mut repo = MockAchievementProgressRepository::new();
        repo.expect_upsert_batch().never();

        service(repo)
            .batch_update_progress(&UserId::random(), Vec::new())
            .await
            .expect("no-op");
    }

    #[rstest]
    fn duplicate_ids_keep_last_entry_in_first_position() {
        let updates = vec![
            ProgressUpdate::new(id("a"), 1, 5, false),
            ProgressUpdate::new(id("b"), 1, 1, true),
            ProgressUpdate::new(id("a"), 4, 5, false),
        ];

        let deduped = dedupe_last_wins(updates);

        assert_eq!(
            deduped,
            vec![
                ProgressUpdate::new(id("a"), 4, 5, false),
                ProgressUpdate::new(id("b"), 1, 1, true),
            ]
        );
    }
}
