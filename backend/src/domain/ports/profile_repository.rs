//! Port for the profile subset the XP pipeline reads and credits.
//!
//! XP credits for a workout are keyed on the workout id. Adapters record
//! the credit and update the profile in one atomic step, so a retried or
//! duplicated completion cannot credit the same workout twice.

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile, WorkoutId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by profile repository adapters.
    pub enum ProfileRepositoryError {
        Connection { message: String } @ Database =>
            "profile repository connection failed: {message}",
        Query { message: String } @ Database =>
            "profile repository query failed: {message}",
        Timeout { message: String } @ Network =>
            "profile repository timed out: {message}",
        /// No profile row exists for the user.
        MissingProfile { user_id: String } @ NotFound =>
            "no profile exists for user {user_id}",
    }
}

/// Result of crediting a workout's XP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XpCreditOutcome {
    /// XP was added; carries the updated profile.
    Credited(UserProfile),
    /// The workout had been credited before; carries the unchanged profile.
    AlreadyCredited(UserProfile),
}

impl XpCreditOutcome {
    /// The profile after the call.
    pub fn profile(&self) -> &UserProfile {
        match self {
            Self::Credited(profile) | Self::AlreadyCredited(profile) => profile,
        }
    }

    /// Whether this call added XP.
    pub const fn is_credited(&self) -> bool {
        matches!(self, Self::Credited(_))
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Fetch the profile, or `None` when the user has none.
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError>;

    /// Credit `xp` for `workout_id` at most once, recomputing the level and
    /// bumping `workouts_count` in the same step.
    async fn credit_workout_xp(
        &self,
        user_id: &UserId,
        workout_id: &WorkoutId,
        xp: u32,
    ) -> Result<XpCreditOutcome, ProfileRepositoryError>;
}

/// Fixture implementation backed by a fresh level-one profile.
///
/// Credits are computed but not stored.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProfileRepository;

#[async_trait]
impl ProfileRepository for FixtureProfileRepository {
    async fn find(&self, user_id: &UserId) -> Result<Option<UserProfile>, ProfileRepositoryError> {
        Ok(Some(UserProfile::new(user_id.clone())))
    }

    async fn credit_workout_xp(
        &self,
        user_id: &UserId,
        _workout_id: &WorkoutId,
        xp: u32,
    ) -> Result<XpCreditOutcome, ProfileRepositoryError> {
        let mut profile = UserProfile::new(user_id.clone());
        profile.credit_xp(xp.into());
        profile.workouts_count += 1;
        Ok(XpCreditOutcome::Credited(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_credit_levels_up_fresh_profile() {
        let repo = FixtureProfileRepository;
        let outcome = repo
            .credit_workout_xp(&UserId::random(), &WorkoutId::random(), 150)
            .await
            .expect("credit");
        assert!(outcome.is_credited());
        assert_eq!(outcome.profile().level, 2);
    }

    #[test]
    fn missing_profile_is_not_transient() {
        let err = ProfileRepositoryError::missing_profile("abc");
        assert!(!err.is_transient());
        assert!(err.to_string().contains("abc"));
    }
}
