//! Achievement HTTP handlers.
//!
//! ```text
//! POST /api/v1/users/{user_id}/achievements/check
//! GET  /api/v1/users/{user_id}/achievements/{achievement_id}/progress
//! ```

use actix_web::{get, post, web};
use serde::Serialize;
use serde_json::json;

use crate::domain::Error;
use crate::domain::achievements::{AchievementId, AchievementProgress};
use crate::domain::coordinator::AchievementCheckReport;
use crate::domain::UserId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_achievement_id, parse_user_id};

/// Response payload for one tracked achievement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgressResponse {
    pub user_id: UserId,
    pub achievement_id: AchievementId,
    pub current: u64,
    pub total: u64,
    pub is_complete: bool,
}

impl AchievementProgressResponse {
    fn new(user_id: UserId, achievement_id: AchievementId, progress: AchievementProgress) -> Self {
        Self {
            user_id,
            achievement_id,
            current: progress.current,
            total: progress.total,
            is_complete: progress.is_complete,
        }
    }
}

/// Run every checker for the user and award what they qualify for.
#[post("/users/{user_id}/achievements/check")]
pub async fn check_achievements(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AchievementCheckReport>> {
    let user_id = parse_user_id(&path.into_inner())?;
    let report = state.achievements.check_achievements(&user_id).await?;
    Ok(web::Json(report))
}

/// Stored progress towards one achievement. Untracked pairs are 404.
#[get("/users/{user_id}/achievements/{achievement_id}/progress")]
pub async fn get_progress(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<AchievementProgressResponse>> {
    let (raw_user_id, raw_achievement_id) = path.into_inner();
    let user_id = parse_user_id(&raw_user_id)?;
    let achievement_id = parse_achievement_id(&raw_achievement_id)?;

    let progress = state
        .progress
        .get_progress(&user_id, &achievement_id)
        .await?
        .ok_or_else(|| {
            Error::not_found("no progress tracked for this achievement").with_details(json!({
                "achievementId": achievement_id.as_ref(),
            }))
        })?;

    Ok(web::Json(AchievementProgressResponse::new(
        user_id,
        achievement_id,
        progress,
    )))
}
