use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use spark_shared::errors::{AppError, AppResult, ErrorCode};
use spark_shared::types::auth::AuthUser;
use spark_shared::types::{ApiResponse, ProfileDocument};

use crate::matching::Candidate;
use crate::AppState;

/// Loads the caller's profile; discovery is only open to completed profiles.
pub(crate) async fn load_viewer(state: &AppState, user: AuthUser) -> AppResult<ProfileDocument> {
    let viewer = state
        .profiles
        .profile(user.id)
        .await?
        .ok_or_else(AppError::profile_not_found)?;

    if !viewer.profile_complete {
        return Err(AppError::new(
            ErrorCode::OnboardingIncomplete,
            "complete your profile before using discovery",
        ));
    }
    Ok(viewer)
}

// --- GET /discovery/candidates ---

pub async fn get_candidates(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<ApiResponse<Vec<Candidate>>>> {
    let viewer = load_viewer(&state, user).await?;
    let candidates = state.selector.select_candidates(&viewer).await;

    Ok(Json(ApiResponse::ok(candidates)))
}
