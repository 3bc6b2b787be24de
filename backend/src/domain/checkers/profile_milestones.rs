//! Achievements read straight off the profile: lifetime XP, level, and
//! class selection.

use std::sync::Arc;

use async_trait::async_trait;

use super::{AchievementChecker, CheckerScope, evaluate_scope};
use crate::domain::achievements::{AchievementId, UserStatistics};
use crate::domain::ports::{AchievementCatalogue, ProfileRepository};
use crate::domain::{Error, UserId};

/// Profile fields as statistics. A user without a profile has zero XP,
/// level zero, and no class.
async fn profile_statistics(
    profiles: &dyn ProfileRepository,
    user_id: &UserId,
) -> Result<UserStatistics, Error> {
    let mut stats = UserStatistics::default();
    if let Some(profile) = profiles.find(user_id).await? {
        stats.xp = profile.xp;
        stats.level = profile.level;
        stats.class = profile.class;
    }
    Ok(stats)
}

/// Lifetime XP and level milestones.
pub struct MilestoneChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    profiles: Arc<dyn ProfileRepository>,
}

impl MilestoneChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            catalogue,
            profiles,
        }
    }
}

#[async_trait]
impl AchievementChecker for MilestoneChecker {
    fn name(&self) -> &'static str {
        "milestone"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        evaluate_scope(self.catalogue.as_ref(), CheckerScope::Milestones, move || {
            profile_statistics(self.profiles.as_ref(), user_id)
        })
        .await
    }
}

/// Class selection.
pub struct ClassChecker {
    catalogue: Arc<dyn AchievementCatalogue>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ClassChecker {
    pub fn new(
        catalogue: Arc<dyn AchievementCatalogue>,
        profiles: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            catalogue,
            profiles,
        }
    }
}

#[async_trait]
impl AchievementChecker for ClassChecker {
    fn name(&self) -> &'static str {
        "class"
    }

    async fn check(&self, user_id: &UserId) -> Result<Vec<AchievementId>, Error> {
        evaluate_scope(self.catalogue.as_ref(), CheckerScope::Class, move || {
            profile_statistics(self.profiles.as_ref(), user_id)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::{bundled, catalogue, definition, ids};
    use super::*;
    use crate::domain::UserProfile;
    use crate::domain::achievements::Requirement;
    use crate::domain::ports::MockProfileRepository;

    fn profiles(profile: UserProfile) -> Arc<MockProfileRepository> {
        let mut repo = MockProfileRepository::new();
        repo.expect_find()
            .times(1)
            .return_once(move |_| Ok(Some(profile)));
        Arc::new(repo)
    }

    #[tokio::test]
    async fn milestones_evaluate_xp_and_level_only() {
        let user = UserId::random();
        let mut profile = UserProfile::new(user.clone());
        profile.credit_xp(1_000);
        let definitions = vec![
            definition("xp-1000", "XP", Requirement::Xp { value: 1_000 }),
            definition("xp-5000", "XP", Requirement::Xp { value: 5_000 }),
            definition("level-5", "LEVEL", Requirement::Level { value: 5 }),
            definition("first-workout", "WORKOUT", Requirement::TotalCount { count: 1 }),
        ];

        let found = MilestoneChecker::new(catalogue(definitions), profiles(profile))
            .check(&user)
            .await
            .expect("check");

        assert_eq!(ids(found), ["xp-1000", "level-5"]);
    }

    #[tokio::test]
    async fn class_checker_matches_selected_class() {
        let user = UserId::random();
        let profile = UserProfile::new(user.clone()).with_class("Rogue");
        let definitions = vec![
            definition("class-chosen", "CLASS", Requirement::Class { class: None }),
            definition(
                "class-warrior",
                "CLASS",
                Requirement::Class { class: Some("warrior".into()) },
            ),
        ];

        let found = ClassChecker::new(catalogue(definitions), profiles(profile))
            .check(&user)
            .await
            .expect("check");

        assert_eq!(ids(found), ["class-chosen"]);
    }

    #[tokio::test]
    async fn fresh_profile_meets_no_bundled_milestone() {
        let user = UserId::random();

        let found = MilestoneChecker::new(catalogue(bundled()), profiles(UserProfile::new(user.clone())))
            .check(&user)
            .await
            .expect("check");

        assert!(found.is_empty());
    }
}
