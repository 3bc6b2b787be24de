//! Unified achievement checker.
//!
//! Runs every category checker for a user, merges their results, filters
//! out achievements the user already holds, and issues each remaining
//! award through the award port's single atomic conditional insert.
//!
//! Failure policy:
//! - a checker that errors or panics is recorded and skipped;
//! - failing to read existing awards or definitions aborts the run, since
//!   nothing can be awarded safely without them;
//! - an award failing after retries is recorded and the run continues;
//! - progress refresh and notification delivery are best-effort.

mod report;

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use futures_util::future::join_all;
use mockable::Clock;
use tracing::{info, instrument, warn};

pub use report::{AchievementCheckReport, AwardFailure, AwardedAchievement, CheckerFailure};

use super::achievements::{
    Achievement, AchievementId, AchievementNotification, ProgressUpdate,
};
use super::checkers::AchievementChecker;
use super::ports::{
    AchievementAwardRepository, AchievementCatalogue, AchievementCheckCommand,
    AchievementNotificationSink, AwardOutcome,
};
use super::progress_service::AchievementProgressService;
use super::retry::RetryExecutor;
use super::statistics_service::UserStatisticsService;
use super::{Error, UserId};

/// Port bundle required by the coordinator.
#[derive(Clone)]
pub struct CoordinatorPorts {
    pub catalogue: Arc<dyn AchievementCatalogue>,
    pub awards: Arc<dyn AchievementAwardRepository>,
    pub notifications: Arc<dyn AchievementNotificationSink>,
    pub progress: AchievementProgressService,
    pub statistics: UserStatisticsService,
}

/// Orchestrates checkers, de-duplication, awards, and progress refresh.
pub struct UnifiedAchievementChecker {
    checkers: Vec<Arc<dyn AchievementChecker>>,
    ports: CoordinatorPorts,
    retry: RetryExecutor,
    clock: Arc<dyn Clock>,
}

impl UnifiedAchievementChecker {
    pub fn new(
        checkers: Vec<Arc<dyn AchievementChecker>>,
        ports: CoordinatorPorts,
        retry: RetryExecutor,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            checkers,
            ports,
            retry,
            clock,
        }
    }

    /// Run the full pipeline for one user.
    #[instrument(skip_all, fields(user_id = %user_id))]
    pub async fn check_user(&self, user_id: &UserId) -> Result<AchievementCheckReport, Error> {
        let mut report = AchievementCheckReport::empty(user_id.clone());

        let (candidates, failures) = self.run_checkers(user_id).await;
        report.candidates = candidates;
        report.failed_checkers = failures;

        let held: HashSet<AchievementId> = self
            .retry
            .execute(
                "awarded_ids",
                || self.ports.awards.awarded_ids(user_id),
                |err| err.is_transient(),
            )
            .await
            .map_err(Error::from)?
            .into_iter()
            .collect();

        let fresh: Vec<AchievementId> = report
            .candidates
            .iter()
            .filter(|id| !held.contains(*id))
            .cloned()
            .collect();

        if !fresh.is_empty() {
            let definitions = self
                .ports
                .catalogue
                .find_by_ids(&fresh)
                .await
                .map_err(Error::from)?;
            for id in &fresh {
                match definitions.iter().find(|achievement| achievement.id() == id) {
                    Some(achievement) => self.award(user_id, achievement, &mut report).await,
                    None => {
                        warn!(achievement_id = %id, "checker reported an id with no definition");
                        report.unknown.push(id.clone());
                    }
                }
            }
        }

        let mut complete = held;
        complete.extend(report.awarded_ids());
        if let Err(error) = self.refresh_progress(user_id, &complete).await {
            warn!(%error, "progress refresh failed");
            report.progress_error = Some(error);
        }

        info!(
            candidates = report.candidates.len(),
            awarded = report.awarded.len(),
            failed_checkers = report.failed_checkers.len(),
            "achievement check finished"
        );
        Ok(report)
    }

    async fn run_checkers(&self, user_id: &UserId) -> (Vec<AchievementId>, Vec<CheckerFailure>) {
        let runs = self.checkers.iter().map(|checker| async move {
            let outcome = AssertUnwindSafe(checker.check(user_id)).catch_unwind().await;
            (checker.name(), outcome)
        });

        let mut seen = HashSet::new();
        let mut candidates = Vec::new();
        let mut failures = Vec::new();
        for (name, outcome) in join_all(runs).await {
            let error = match outcome {
                Ok(Ok(ids)) => {
                    candidates.extend(ids.into_iter().filter(|id| seen.insert(id.clone())));
                    continue;
                }
                Ok(Err(error)) => error,
                Err(_) => Error::processing(format!("checker {name} panicked")),
            };
            warn!(checker = name, code = error.code().as_str(), %error, "checker failed");
            failures.push(CheckerFailure {
                checker: name.to_owned(),
                error,
            });
        }
        (candidates, failures)
    }

    async fn award(
        &self,
        user_id: &UserId,
        achievement: &Achievement,
        report: &mut AchievementCheckReport,
    ) {
        let awarded_at = self.clock.utc();
        let outcome = self
            .retry
            .execute(
                "award_achievement",
                || self.ports.awards.award(user_id, achievement, awarded_at),
                |err| err.is_transient(),
            )
            .await;

        match outcome {
            Ok(AwardOutcome::Awarded { xp_credited }) => {
                info!(achievement_id = %achievement.id(), xp_credited, "achievement awarded");
                report.awarded.push(AwardedAchievement {
                    achievement_id: achievement.id().clone(),
                    xp_credited,
                });
                let notification = AchievementNotification::for_award(achievement, awarded_at);
                if let Err(error) = self.ports.notifications.publish(notification).await {
                    warn!(achievement_id = %achievement.id(), %error, "notification not queued");
                }
            }
            Ok(AwardOutcome::AlreadyAwarded) => {
                info!(achievement_id = %achievement.id(), "achievement already held");
            }
            Err(error) => {
                let error = Error::from(error);
                warn!(achievement_id = %achievement.id(), %error, "award failed");
                report.failed_awards.push(AwardFailure {
                    achievement_id: achievement.id().clone(),
                    error,
                });
            }
        }
    }

    /// Write requirement-derived progress for every catalogue entry, with
    /// held achievements marked complete.
    async fn refresh_progress(
        &self,
        user_id: &UserId,
        complete: &HashSet<AchievementId>,
    ) -> Result<(), Error> {
        let catalogue = self.ports.catalogue.list_all().await?;
        if catalogue.is_empty() {
            return Ok(());
        }
        let stats = self.ports.statistics.collect(user_id).await?;
        let updates = catalogue
            .iter()
            .map(|achievement| {
                let progress = achievement.progress(&stats);
                let held = complete.contains(achievement.id());
                let current = if held { progress.target } else { progress.current };
                ProgressUpdate::new(achievement.id().clone(), current, progress.target, held)
            })
            .collect();
        self.ports
            .progress
            .batch_update_progress(user_id, updates)
            .await
    }
}

#[async_trait]
impl AchievementCheckCommand for UnifiedAchievementChecker {
    async fn check_achievements(&self, user_id: &UserId) -> Result<AchievementCheckReport, Error> {
        self.check_user(user_id).await
    }
}
