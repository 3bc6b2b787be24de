//! Workout completion HTTP handler.
//!
//! ```text
//! POST /api/v1/users/{user_id}/workouts/{workout_id}/complete
//! ```

use actix_web::{post, web};

use crate::domain::ports::{CompleteWorkoutRequest, WorkoutCompletionOutcome};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_user_id, parse_workout_id};

/// Credit a finished workout and evaluate achievements.
///
/// Repeating the call for the same workout returns `xpAwarded: 0` with
/// `alreadyCredited: true` instead of crediting twice.
#[post("/users/{user_id}/workouts/{workout_id}/complete")]
pub async fn complete_workout(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<WorkoutCompletionOutcome>> {
    let (raw_user_id, raw_workout_id) = path.into_inner();
    let request = CompleteWorkoutRequest {
        user_id: parse_user_id(&raw_user_id)?,
        workout_id: parse_workout_id(&raw_workout_id)?,
    };
    let outcome = state.completions.complete_workout(request).await?;
    Ok(web::Json(outcome))
}
