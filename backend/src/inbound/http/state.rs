//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AchievementCheckCommand, AchievementProgressQuery, WorkoutCompletionCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub completions: Arc<dyn WorkoutCompletionCommand>,
    pub achievements: Arc<dyn AchievementCheckCommand>,
    pub progress: Arc<dyn AchievementProgressQuery>,
}

impl HttpState {
    pub fn new(
        completions: Arc<dyn WorkoutCompletionCommand>,
        achievements: Arc<dyn AchievementCheckCommand>,
        progress: Arc<dyn AchievementProgressQuery>,
    ) -> Self {
        Self {
            completions,
            achievements,
            progress,
        }
    }
}
